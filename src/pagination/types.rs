//! Pagination types
//!
//! The page envelope and the page-number strategy used by every list endpoint.

use crate::decode::fields;
use crate::types::{JsonValue, StringMap};
use serde::Deserialize;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageEnvelope {
    /// Zero-based page number
    #[serde(deserialize_with = "fields::count")]
    pub page: u64,
    /// Total number of pages
    #[serde(deserialize_with = "fields::count")]
    pub pages_count: u64,
    /// Items on this page
    pub items: Vec<JsonValue>,
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters to add/replace
        query_params: StringMap,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with a single parameter
    pub fn with_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut query_params = StringMap::new();
        query_params.insert(key.into(), value.into());
        Self::Continue { query_params }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Page to request next
    pub page: u64,
    /// Page count reported by the last envelope
    pub pages_count: Option<u64>,
    /// Total items fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Page-number pagination over [`PageEnvelope`]s.
///
/// Requests `?page=0`, `?page=1`, ... and stops once the envelope reports
/// that the current page is the last one (`page + 1 >= pages_count`).
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
}

impl Default for PageNumberPaginator {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
        }
    }
}

impl PageNumberPaginator {
    /// Create a paginator using the `page` query parameter
    pub fn new() -> Self {
        Self::default()
    }

    /// Query parameters for the next request
    pub fn params(&self, state: &PaginationState) -> StringMap {
        let mut params = StringMap::new();
        params.insert(self.page_param.clone(), state.page.to_string());
        params
    }

    /// Record a received page and decide whether to continue
    pub fn process_page(&self, envelope: &PageEnvelope, state: &mut PaginationState) -> NextPage {
        state.add_fetched(envelope.items.len() as u64);
        state.pages_count = Some(envelope.pages_count);

        // Counted from the requested page, not the echoed one
        if state.page + 1 >= envelope.pages_count {
            state.mark_done();
            return NextPage::Done;
        }

        state.page += 1;
        NextPage::with_param(&self.page_param, state.page.to_string())
    }
}
