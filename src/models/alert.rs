//! Alert records

use crate::decode::{fields, Record};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Shortest stall period the platform accepts
pub const MIN_TIME_STALL_SECS: u64 = 60;

/// What triggers an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// The source was updated and the condition holds
    Update,
    /// The source has not been updated for `time_stall` seconds
    Stall,
}

/// An alert as returned by `workspace/{ws}/alerts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertInfo {
    /// Alert id
    #[serde(alias = "alert_id")]
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
    /// Subscribed e-mail addresses
    #[serde(default)]
    pub subscriptions: Vec<String>,
    /// Display color
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub color: String,
    /// Trigger kind
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Watched source
    #[serde(rename = "source", alias = "source_id", default)]
    pub source_id: Option<String>,
    /// Trigger condition, for update alerts
    #[serde(default)]
    pub condition: Option<JsonValue>,
    /// Stall period in seconds, for stall alerts
    #[serde(default)]
    pub time_stall: Option<u64>,
}

impl Record for AlertInfo {
    const KIND: &'static str = "alert";
}

/// Payload for creating an alert
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Subscribed e-mail addresses
    pub subscriptions: Vec<String>,
    /// Display color
    pub color: String,
    /// Trigger kind
    pub alert_type: AlertType,
    /// Watched source
    pub source_id: String,
    /// Trigger condition
    pub condition: Option<JsonValue>,
    /// Stall period in seconds; at least [`MIN_TIME_STALL_SECS`]
    pub time_stall: Option<u64>,
}

impl NewAlert {
    /// An alert on a source with no subscribers, condition or stall period
    pub fn new(name: impl Into<String>, alert_type: AlertType, source_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            subscriptions: Vec::new(),
            color: "#FF0000".to_string(),
            alert_type,
            source_id: source_id.into(),
            condition: None,
            time_stall: None,
        }
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a subscriber
    #[must_use]
    pub fn subscribe(mut self, email: impl Into<String>) -> Self {
        self.subscriptions.push(email.into());
        self
    }

    /// Set the color
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the trigger condition
    #[must_use]
    pub fn condition(mut self, condition: JsonValue) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set the stall period in seconds
    #[must_use]
    pub fn time_stall(mut self, seconds: u64) -> Self {
        self.time_stall = Some(seconds);
        self
    }

    /// Check the values the platform would reject
    pub fn validate(&self) -> Result<()> {
        match self.time_stall {
            Some(stall) if stall < MIN_TIME_STALL_SECS => Err(Error::validation(
                "ALERT_CREATION_VALUES",
                format!("Minimum alert time stall is {MIN_TIME_STALL_SECS} seconds."),
            )),
            _ => Ok(()),
        }
    }

    /// Request body
    pub fn to_body(&self) -> JsonValue {
        json!({
            "name": self.name,
            "description": self.description,
            "subscriptions": self.subscriptions,
            "color": self.color,
            "type": self.alert_type,
            "source": self.source_id,
            "condition": self.condition,
            "time_stall": self.time_stall,
        })
    }
}
