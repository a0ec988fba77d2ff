//! Workspace records

use crate::decode::{fields, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A workspace as returned by `workspace/{id}` and the workspace listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    /// Workspace id (uuid4)
    #[serde(alias = "workspace_id")]
    pub id: String,
    /// Display name
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub name: String,
    /// Free-text description
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub description: String,
    /// Creation date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Last access date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub last_access: Option<DateTime<Utc>>,
    /// Number of sources
    #[serde(default, deserialize_with = "fields::count")]
    pub sources_count: u64,
    /// Number of dashboards
    #[serde(default, deserialize_with = "fields::count")]
    pub dashboards_count: u64,
    /// Number of visualizations
    #[serde(default, deserialize_with = "fields::count")]
    pub visualizations_count: u64,
    /// Number of models
    #[serde(default, deserialize_with = "fields::count")]
    pub models_count: u64,
    /// Storage used, in bytes
    #[serde(default, deserialize_with = "fields::count")]
    pub size_bytes: u64,
}

impl Record for WorkspaceInfo {
    const KIND: &'static str = "workspace";
}
