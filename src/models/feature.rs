//! Source features (columns)

use crate::decode::{fields, Record};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Data type of a source feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    /// Integer or floating point values
    Numeric,
    /// Categorical values
    Nominal,
    /// Timestamps
    Date,
    /// Booleans
    Logic,
    /// Free text
    Text,
    /// Type not determined
    Unknown,
}

impl FeatureType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Numeric => "numeric",
            FeatureType::Nominal => "nominal",
            FeatureType::Date => "date",
            FeatureType::Logic => "logic",
            FeatureType::Text => "text",
            FeatureType::Unknown => "unknown",
        }
    }

    /// Infer the type of a column from its values.
    ///
    /// Nulls are ignored; an all-null column is `Unknown`. Strings that all
    /// parse as dates make a `Date` column, any other strings `Nominal`.
    /// Mixed kinds fall back to `Nominal`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut inferred: Option<FeatureType> = None;

        for value in values {
            let kind = match value {
                Value::Null => continue,
                Value::Bool(_) => FeatureType::Logic,
                Value::Number(_) => FeatureType::Numeric,
                Value::String(s) if fields::parse_date(s).is_some() => FeatureType::Date,
                _ => FeatureType::Nominal,
            };
            inferred = match inferred {
                None => Some(kind),
                Some(current) if current == kind => Some(current),
                Some(_) => return FeatureType::Nominal,
            };
        }

        inferred.unwrap_or(FeatureType::Unknown)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feature of a source, with the statistics the platform computes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFeature {
    /// Zero-based column index
    #[serde(deserialize_with = "fields::count")]
    pub index: u64,
    /// Column name
    pub name: String,
    /// Data type
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    /// Whether the column is indexed
    #[serde(default)]
    pub indexed: bool,
    /// Date format, for date columns
    #[serde(default)]
    pub date_format: Option<String>,
    /// Whether the column is computed by the platform
    #[serde(default)]
    pub computed: bool,
    /// Number of null values
    #[serde(default, deserialize_with = "fields::count")]
    pub null_count: u64,
    /// Minimum value (number or date string)
    #[serde(default)]
    pub min: Option<JsonValue>,
    /// Maximum value (number or date string)
    #[serde(default)]
    pub max: Option<JsonValue>,
    /// Mean, for numeric columns
    #[serde(default, deserialize_with = "fields::float_opt")]
    pub mean: Option<f64>,
    /// Standard deviation, for numeric columns
    #[serde(default, deserialize_with = "fields::float_opt")]
    pub deviation: Option<f64>,
}

impl Record for SourceFeature {
    const KIND: &'static str = "feature";
}

impl SourceFeature {
    /// A feature definition with no statistics
    pub fn new(index: u64, name: impl Into<String>, feature_type: FeatureType) -> Self {
        Self {
            index,
            name: name.into(),
            feature_type,
            indexed: true,
            date_format: None,
            computed: false,
            null_count: 0,
            min: None,
            max: None,
            mean: None,
            deviation: None,
        }
    }

    /// Set the date format
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Set whether the feature is indexed
    #[must_use]
    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Definition sent when creating a source or updating its features
    pub fn minimized(&self) -> JsonValue {
        json!({
            "name": self.name,
            "type": self.feature_type,
            "date_format": self.date_format,
            "indexed": self.indexed,
        })
    }
}
