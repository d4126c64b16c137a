//! Identifiers shared between the document, the host bus and the footnote runtime.
//!
//! All ids are plain newtypes over `u64`; the value carries no meaning beyond
//! identity. `0` is reserved and never handed out by any allocator.

use std::fmt;

/// Identifies one connected component instance within a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

/// Handle returned by an environment-change signal when a listener subscribes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Cancel token for a callback queued for the next rendering frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

macro_rules! impl_id {
    ($ty:ident, $label:literal) => {
        impl $ty {
            /// Reserved sentinel for "unassigned".
            pub const INVALID: $ty = $ty(0);

            #[inline]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn as_raw(self) -> u64 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

impl_id!(ComponentId, "component");
impl_id!(SubscriptionId, "subscription");
impl_id!(FrameToken, "frame");

/// Monotonic allocator for the id newtypes above. Starts at 1.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_raw(&mut self) -> u64 {
        let raw = self.next;
        self.next = self.next.checked_add(1).unwrap_or(1);
        raw
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
