//! Listing cursor.

use serde::{Deserialize, Serialize};

/// Number of entities requested per listing page.
pub const PAGE_SIZE: u64 = 100;

/// Zero-based page index over a fixed page size.
///
/// Advances by exactly one per page and never decreases.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Page(u64);

impl Page {
    /// The first page (offset 0).
    pub const FIRST: Page = Page(0);

    /// Creates a cursor at page `index`.
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the page index.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the following page.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the entity offset of this page.
    pub fn offset(self, page_size: u64) -> u64 {
        self.0.saturating_mul(page_size)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_advance_by_one_and_scale_offsets() {
        let third = Page::FIRST.next().next();

        assert_eq!(third, Page::new(2));
        assert_eq!(third.offset(PAGE_SIZE), 200);
        assert_eq!(Page::FIRST.offset(PAGE_SIZE), 0);
    }
}
