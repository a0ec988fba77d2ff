//! Dashboard and visualization records

use crate::decode::{fields, Record};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A dashboard as returned by `workspace/{ws}/dashboard/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardInfo {
    /// Dashboard id
    #[serde(alias = "dashboard_id")]
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
}

impl Record for DashboardInfo {
    const KIND: &'static str = "dashboard";
}

/// A visualization as returned by `workspace/{ws}/visualization/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationInfo {
    /// Visualization id
    #[serde(alias = "visualization_id")]
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
    /// Source the visualization draws from
    #[serde(rename = "source", alias = "source_id", default)]
    pub source_id: Option<String>,
}

impl Record for VisualizationInfo {
    const KIND: &'static str = "visualization";
}

/// Payload for creating a dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct NewDashboard {
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Privacy setting, e.g. `public` or `private`
    pub privacy: String,
    /// Sharing option
    pub share_opt: String,
    /// Google Analytics id
    pub ga_id: Option<String>,
    /// Restrict access to organization members
    pub restricted: bool,
    /// Layout configuration
    pub configuration: JsonValue,
}

impl NewDashboard {
    /// A private, restricted dashboard with an empty layout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            privacy: "private".to_string(),
            share_opt: String::new(),
            ga_id: None,
            restricted: true,
            configuration: json!({}),
        }
    }

    /// Request body
    pub fn to_body(&self) -> JsonValue {
        json!({
            "name": self.name,
            "description": self.description,
            "privacy": self.privacy,
            "shareOpt": self.share_opt,
            "gaId": self.ga_id,
            "restricted": self.restricted,
            "configuration": self.configuration,
        })
    }
}

/// Payload for creating a visualization
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisualization {
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Privacy setting, e.g. `public` or `private`
    pub privacy: String,
    /// Source to draw from
    pub source_id: String,
    /// Chart configuration
    pub configuration: JsonValue,
}

impl NewVisualization {
    /// A private visualization over a source
    pub fn new(name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            privacy: "private".to_string(),
            source_id: source_id.into(),
            configuration: json!({}),
        }
    }

    /// Request body
    pub fn to_body(&self) -> JsonValue {
        json!({
            "name": self.name,
            "description": self.description,
            "privacy": self.privacy,
            "source": self.source_id,
            "configuration": self.configuration,
        })
    }
}
