//! Print-only footnotes for the links inside an `<improved-print>` element.
//!
//! On the first connect every eligible link gets a hidden superscript index and
//! a matching hidden entry in a `<nav><ol>` inside the element's shadow root.
//! Print mode reveals both immediately; leaving print mode hides them again one
//! frame later.

pub mod config;
pub mod controller;
pub mod element;
pub mod error;
pub mod factory;
pub mod scanner;

pub use config::{FootnoteConfig, OPT_OUT_ATTR, PRINT_ONLY_CLASS};
pub use controller::{HostContext, PrintController, PrintState, Visibility};
pub use element::{ImprovedPrint, TAG_NAME};
pub use error::{ConfigError, ElementError};
pub use factory::{
    CITATION_INDEX_ATTR, CitationIndex, FootnoteList, make_footnote_entry, make_footnote_list,
    make_index_marker, stamp_template,
};
pub use scanner::{LinkRef, LinkScanner};
