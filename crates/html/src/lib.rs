//! Minimal mutable document model: an arena of nodes with attributes, shadow
//! roots and compound-selector queries, plus deterministic outlines for tests.

pub mod debug;
mod document;
mod selector;
mod types;

pub use crate::debug::{outline, outline_from_dom};
pub use crate::document::{Descendants, Document, DomError};
pub use crate::selector::{Compound, SelectorError, SelectorErrorKind, SelectorList};
pub use crate::types::{Node, NodeKey};
