//! Source records
//!
//! The `type` field of a source payload selects the [`Source`] variant.
//! Unknown types, or variant fields that are missing, fail the mapping.

use super::feature::SourceFeature;
use crate::decode::{fields, Record};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of a source, as reported in its `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Derived from other sources
    Derived,
    /// Uploaded CSV
    Csv,
    /// SQL database query
    Database,
    /// CSV downloaded from a URL
    UrlCsv,
    /// JSON downloaded from a URL
    UrlJson,
    /// CKAN dataset
    Ckan,
    /// Object in S3-compatible storage
    S3,
    /// MongoDB collection
    Mongodb,
    /// InfluxDB query
    Influx,
    /// MQTT topic
    Mqtt,
    /// Pushed in real time
    RealTime,
    /// Served by an external endpoint
    External,
}

impl SourceType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Derived => "derived",
            SourceType::Csv => "csv",
            SourceType::Database => "database",
            SourceType::UrlCsv => "url_csv",
            SourceType::UrlJson => "url_json",
            SourceType::Ckan => "ckan",
            SourceType::S3 => "s3",
            SourceType::Mongodb => "mongodb",
            SourceType::Influx => "influx",
            SourceType::Mqtt => "mqtt",
            SourceType::RealTime => "real_time",
            SourceType::External => "external",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source id (uuid4)
    #[serde(alias = "source_id")]
    pub id: String,
    /// Display name
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub name: String,
    /// Free-text description
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub description: String,
    /// Discriminator
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Creation date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Last access date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub last_access: Option<DateTime<Utc>>,
    /// Number of rows
    #[serde(default, deserialize_with = "fields::count")]
    pub instances_count: u64,
    /// Storage used, in bytes
    #[serde(default, deserialize_with = "fields::count")]
    pub size_bytes: u64,
}

impl Record for SourceInfo {
    const KIND: &'static str = "source";
}

/// A source holding its own rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardSource {
    /// Common fields
    #[serde(flatten)]
    pub info: SourceInfo,
    /// Columns
    pub features: Vec<SourceFeature>,
}

/// A source fed in real time, keeping rows for `max_age`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealTimeSource {
    /// Common fields
    #[serde(flatten)]
    pub info: SourceInfo,
    /// Columns
    pub features: Vec<SourceFeature>,
    /// Retention of rows, in milliseconds (0 keeps everything)
    pub max_age: u64,
}

/// A source whose rows are served by an external endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalSource {
    /// Common fields
    #[serde(flatten)]
    pub info: SourceInfo,
    /// Columns
    pub features: Vec<SourceFeature>,
    /// Endpoint serving the data
    pub url: String,
}

/// A source, by variant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Source {
    /// Any source type holding its own data
    Standard(StandardSource),
    /// `real_time`
    RealTime(RealTimeSource),
    /// `external`
    External(ExternalSource),
}

impl Record for Source {
    const KIND: &'static str = "source";
}

impl Source {
    /// Common fields
    pub fn info(&self) -> &SourceInfo {
        match self {
            Source::Standard(s) => &s.info,
            Source::RealTime(s) => &s.info,
            Source::External(s) => &s.info,
        }
    }

    /// Columns
    pub fn features(&self) -> &[SourceFeature] {
        match self {
            Source::Standard(s) => &s.features,
            Source::RealTime(s) => &s.features,
            Source::External(s) => &s.features,
        }
    }

    /// Source id
    pub fn id(&self) -> &str {
        &self.info().id
    }

    /// Look up a feature by name
    pub fn feature_by_name(&self, name: &str) -> Option<&SourceFeature> {
        self.features().iter().find(|f| f.name == name)
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let info = SourceInfo::deserialize(&value).map_err(de::Error::custom)?;

        let features = match value.get("features") {
            None | Some(Value::Null) => Vec::new(),
            Some(features) => Vec::<SourceFeature>::deserialize(features)
                .map_err(|e| de::Error::custom(format!("features: {e}")))?,
        };

        match info.source_type {
            SourceType::RealTime => {
                let max_age = match value.get("max_age") {
                    None | Some(Value::Null) => return Err(de::Error::missing_field("max_age")),
                    Some(max_age) => fields::count(max_age).map_err(de::Error::custom)?,
                };
                Ok(Source::RealTime(RealTimeSource {
                    info,
                    features,
                    max_age,
                }))
            }
            SourceType::External => {
                let url = value
                    .get("url")
                    .and_then(Value::as_str)
                    .filter(|url| !url.is_empty())
                    .ok_or_else(|| de::Error::missing_field("url"))?
                    .to_string();
                Ok(Source::External(ExternalSource {
                    info,
                    features,
                    url,
                }))
            }
            _ => Ok(Source::Standard(StandardSource { info, features })),
        }
    }
}
