//! Task records

use crate::decode::{fields, Record};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a server-side task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Queued
    Pending,
    /// In progress
    Running,
    /// Finished successfully
    Success,
    /// Finished with an error
    Failed,
}

impl TaskStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
        }
    }

    /// Whether the task has stopped running
    pub fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "running" => Ok(TaskStatus::Running),
            "success" => Ok(TaskStatus::Success),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(Error::validation(
                "TASK_STATUS",
                format!("unknown task status '{other}' (expected pending, running, success or failed)"),
            )),
        }
    }
}

/// A task as returned by `workspace/{ws}/task/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Task id
    #[serde(alias = "task_id")]
    pub id: String,
    /// Display name
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub name: String,
    /// Free-text description
    #[serde(default, deserialize_with = "fields::nullable_string")]
    pub description: String,
    /// Current state
    pub status: TaskStatus,
    /// Creation date
    #[serde(default, deserialize_with = "fields::date_opt")]
    pub created: Option<DateTime<Utc>>,
    /// Completion percentage
    #[serde(default, deserialize_with = "fields::float_opt")]
    pub progress: Option<f64>,
    /// Run time, in milliseconds
    #[serde(default, deserialize_with = "fields::count")]
    pub duration: u64,
    /// Error code, for failed tasks
    #[serde(default)]
    pub error_code: Option<String>,
    /// Error message, for failed tasks
    #[serde(default)]
    pub error_description: Option<String>,
}

impl Record for TaskInfo {
    const KIND: &'static str = "task";
}
