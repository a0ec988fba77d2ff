//! Endpoint operations
//!
//! Handles are cheap to clone and hold the shared [`HttpClient`] plus the
//! identifiers of the object they address. Creating a handle never touches
//! the network; each method is one or more HTTP round trips.
//!
//! ```text
//! OrganizationApi ── workspace(id) ──▶ WorkspaceApi ─┬─ source(id) ──▶ SourceApi
//!                                                    └─ task(id)   ──▶ TaskApi
//! ```

mod custom;
mod organization;
mod source;
mod task;
mod workspace;

pub use custom::CustomEndpoint;
pub use organization::OrganizationApi;
pub use source::{FeatureRef, SourceApi};
pub use task::{ResolveOptions, TaskApi};
pub use workspace::{ModelCreation, WorkspaceApi};

use crate::http::{HttpClient, RequestConfig};
use std::sync::Arc;

/// Find an object by id or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Match the id
    Id(&'a str),
    /// Match the name exactly
    Name(&'a str),
}

impl Lookup<'_> {
    /// Whether an object with this id and name matches
    pub fn matches(&self, id: &str, name: &str) -> bool {
        match self {
            Lookup::Id(wanted) => *wanted == id,
            Lookup::Name(wanted) => *wanted == name,
        }
    }
}

/// Organization-scoped request plumbing shared by every handle
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    http: Arc<HttpClient>,
    organization: String,
}

impl Scope {
    pub(crate) fn new(http: Arc<HttpClient>, organization: impl Into<String>) -> Self {
        Self {
            http,
            organization: organization.into(),
        }
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    pub(crate) fn organization(&self) -> &str {
        &self.organization
    }

    /// Request config carrying the organization header
    pub(crate) fn request(&self) -> RequestConfig {
        RequestConfig::new().organization(&self.organization)
    }
}
