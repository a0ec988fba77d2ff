//! Task operations
//!
//! Long-running work (instance uploads, feature updates, model training)
//! is reported as a task. [`TaskApi::resolve`] polls until the task leaves
//! `pending`/`running`.

use super::Scope;
use crate::decode;
use crate::error::{Error, Result};
use crate::models::{TaskInfo, TaskStatus};
use crate::types::JsonValue;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Polling behaviour for [`TaskApi::resolve`]
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Delay between status checks
    pub poll_interval: Duration,
    /// Give up after this long; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: None,
        }
    }
}

impl ResolveOptions {
    /// Set the poll interval
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall deadline
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Operations on one task
#[derive(Debug, Clone)]
pub struct TaskApi {
    scope: Scope,
    workspace_id: String,
    task_id: String,
}

impl TaskApi {
    pub(crate) fn new(
        scope: Scope,
        workspace_id: impl Into<String>,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            scope,
            workspace_id: workspace_id.into(),
            task_id: task_id.into(),
        }
    }

    /// Task id
    pub fn id(&self) -> &str {
        &self.task_id
    }

    /// Owning workspace id
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn path(&self, rest: &str) -> String {
        if rest.is_empty() {
            format!("workspace/{}/task/{}", self.workspace_id, self.task_id)
        } else {
            format!(
                "workspace/{}/task/{}/{rest}",
                self.workspace_id, self.task_id
            )
        }
    }

    /// Current task state
    pub async fn info(&self) -> Result<TaskInfo> {
        let body = self
            .scope
            .http()
            .get(&self.path(""), self.scope.request())
            .await?;
        decode::decode(body)
    }

    /// Cancel and delete the task
    pub async fn delete(&self) -> Result<()> {
        self.scope
            .http()
            .delete(&self.path(""), self.scope.request())
            .await?;
        Ok(())
    }

    /// Result payload of a finished task
    pub async fn result(&self) -> Result<JsonValue> {
        self.scope
            .http()
            .get(&self.path("result"), self.scope.request())
            .await
    }

    /// Poll until the task finishes.
    ///
    /// Returns the final state on success. A failed task becomes
    /// [`Error::TaskFailed`]; running past the deadline becomes
    /// [`Error::Timeout`].
    pub async fn resolve(&self, options: &ResolveOptions) -> Result<TaskInfo> {
        let deadline = options.timeout.map(|t| Instant::now() + t);

        loop {
            let task = self.info().await?;
            match task.status {
                TaskStatus::Success => {
                    info!("Task {} finished", self.task_id);
                    return Ok(task);
                }
                TaskStatus::Failed => {
                    warn!(
                        "Task {} failed: {}",
                        self.task_id,
                        task.error_description.as_deref().unwrap_or("no description")
                    );
                    return Err(Error::TaskFailed {
                        task_id: self.task_id.clone(),
                        code: task.error_code.unwrap_or_else(|| "TASK_FAILED".to_string()),
                        message: task.error_description.unwrap_or_default(),
                    });
                }
                TaskStatus::Pending | TaskStatus::Running => {}
            }

            if let (Some(deadline), Some(timeout)) = (deadline, options.timeout) {
                if Instant::now() + options.poll_interval > deadline {
                    return Err(Error::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
            }

            debug!(
                "Task {} is {}, checking again in {:?}",
                self.task_id, task.status, options.poll_interval
            );
            sleep(options.poll_interval).await;
        }
    }
}
