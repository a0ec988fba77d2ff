//! Pagination module
//!
//! List endpoints answer with page envelopes:
//!
//! ```json
//! { "page": 0, "pages_count": 3, "items": [ ... ] }
//! ```
//!
//! # Overview
//!
//! [`PageNumberPaginator`] tracks the page to request next and decides when
//! the listing is exhausted. [`paginate`] drives it over an [`crate::http::HttpClient`]
//! and yields the items of every page as one stream.

mod stream;
mod types;

pub use stream::{collect_all, fetch_all, paginate};
pub use types::{NextPage, PageEnvelope, PageNumberPaginator, PaginationState};
