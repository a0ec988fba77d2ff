// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # deepint
//!
//! Client SDK for the Deep Intelligence REST API.
//!
//! ## Features
//!
//! - **Credential resolution**: explicit values, `DEEPINT_*` environment
//!   variables, then `~/.deepint.ini`, each field on its own
//! - **Typed responses**: JSON payloads mapped into records; unexpected
//!   shapes fail with [`Error::MalformedResponse`]
//! - **Pagination**: page-number listings streamed lazily
//! - **Resource handles**: organizations, workspaces, sources, tasks,
//!   alerts, models, dashboards and visualizations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deepint::{Client, Credentials, Lookup, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new(Credentials::builder().organization("my-org").resolve()?)?;
//!
//!     let org = client.organization()?;
//!     let ws = org.create_workspace_if_not_exists("sales").await?;
//!
//!     for source in ws.list_sources().await? {
//!         println!("{} {}", source.id, source.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Client ── OrganizationApi ── WorkspaceApi ── SourceApi    │
//! │                                          └── TaskApi      │
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//! ┌────────────┬───────────────┴──┬────────────┬─────────────┐
//! │    Auth    │      HTTP        │  Paginate  │   Decode    │
//! ├────────────┼──────────────────┼────────────┼─────────────┤
//! │ explicit   │ token header     │ page /     │ records     │
//! │ env        │ org header       │ pages_count│ dates       │
//! │ ini file   │ status → Error   │            │ counts      │
//! └────────────┴──────────────────┴────────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and their resolution
pub mod auth;

/// HTTP client
pub mod http;

/// Page-number pagination
pub mod pagination;

/// Response mapping into typed records
pub mod decode;

/// Domain records
pub mod models;

/// Endpoint operations
pub mod api;

/// Resource identifiers from URLs
pub mod locator;

/// Client facade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{
    CustomEndpoint, FeatureRef, Lookup, ModelCreation, OrganizationApi, ResolveOptions,
    SourceApi, TaskApi, WorkspaceApi,
};
pub use auth::Credentials;
pub use client::Client;
pub use locator::{parse_url, ResourceKind, ResourceLocator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
