//! Bug query pipeline
//!
//! Listing is a pure function over a borrowed slice of bugs, run in a fixed
//! order:
//!
//! 1. **Filter**: keep bugs satisfying every active [`FilterSpec`] criterion.
//! 2. **Sort**: stable sort by the [`SortSpec`] field, if one is given;
//!    otherwise the storage order is kept.
//! 3. **Page**: slice out the requested [`PageSpec`] window.
//!
//! `total_count` in the result always counts the filtered set, never the page.
//! The input slice is never modified.

pub mod filter;
pub mod page;
pub mod sort;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::Bug;

pub use filter::{BugMatcher, FilterSpec, TextMatcher};
pub use page::{PageSpec, DEFAULT_PAGE_SIZE};
pub use sort::{SortDirection, SortField, SortSpec};

/// Errors from parsing textual sort parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryParseError {
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),
}

/// Everything needed to run one listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugQuery {
    pub filter: FilterSpec,
    pub sort: Option<SortSpec>,
    pub page: PageSpec,
}

impl BugQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: PageSpec) -> Self {
        self.page = page;
        self
    }

    /// Run the pipeline over `bugs`
    pub fn run(&self, bugs: &[Bug]) -> QueryResult {
        query(bugs, &self.filter, self.sort.as_ref(), &self.page)
    }
}

/// One page of bugs plus pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub bugs: Vec<Bug>,
    pub total_count: usize,
    pub page_size: usize,
    pub page_idx: usize,
    pub total_pages: usize,
}

/// Filter then sort, without paging
pub fn filter_and_sort<'a>(
    bugs: &'a [Bug],
    filter: &FilterSpec,
    sort: Option<&SortSpec>,
) -> Vec<&'a Bug> {
    let matcher = BugMatcher::new(filter);
    let mut selected: Vec<&Bug> = bugs.iter().filter(|bug| matcher.matches(bug)).collect();

    if let Some(sort) = sort {
        // `sort_by` is stable: equal keys keep their filtered order.
        selected.sort_by(|a, b| sort.compare(a, b));
    }

    selected
}

/// Filter, sort and page `bugs`
pub fn query(
    bugs: &[Bug],
    filter: &FilterSpec,
    sort: Option<&SortSpec>,
    page: &PageSpec,
) -> QueryResult {
    let selected = filter_and_sort(bugs, filter, sort);
    let total_count = selected.len();

    let page_bugs = selected[page.bounds(total_count)]
        .iter()
        .map(|bug| (*bug).clone())
        .collect();

    QueryResult {
        bugs: page_bugs,
        total_count,
        page_size: page.effective_size(),
        page_idx: page.idx,
        total_pages: page.total_pages(total_count),
    }
}
