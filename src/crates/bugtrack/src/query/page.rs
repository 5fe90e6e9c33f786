//! Page selection

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Page size used when the caller gives none
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Zero-based page index and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub idx: usize,
    pub size: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            idx: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageSpec {
    pub fn new(idx: usize, size: usize) -> Self {
        Self { idx, size }
    }

    /// Page size actually applied; a zero size is treated as one
    pub fn effective_size(&self) -> usize {
        self.size.max(1)
    }

    /// `ceil(total / size)`, zero for an empty set
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.effective_size())
    }

    /// Slice bounds of this page within `total` items. Pages past the end
    /// give an empty range.
    pub fn bounds(&self, total: usize) -> Range<usize> {
        let size = self.effective_size();
        let start = self.idx.saturating_mul(size).min(total);
        let end = start.saturating_add(size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let page = PageSpec::default();
        assert_eq!(page.idx, 0);
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages() {
        let page = PageSpec::new(0, 3);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(3), 1);
        assert_eq!(page.total_pages(4), 2);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(PageSpec::new(1, 2).bounds(5), 2..4);
        assert_eq!(PageSpec::new(2, 2).bounds(5), 4..5);
        assert_eq!(PageSpec::new(10, 3).bounds(5), 5..5);
    }

    #[test]
    fn test_huge_index_does_not_overflow() {
        assert_eq!(PageSpec::new(usize::MAX, usize::MAX).bounds(7), 7..7);
    }

    #[test]
    fn test_zero_size_is_one() {
        let page = PageSpec::new(0, 0);
        assert_eq!(page.effective_size(), 1);
        assert_eq!(page.bounds(3), 0..1);
        assert_eq!(page.total_pages(3), 3);
    }
}
