//! Organization operations

use super::workspace::WorkspaceApi;
use super::{Lookup, Scope};
use crate::decode;
use crate::error::Result;
use crate::http::HttpClient;
use crate::models::WorkspaceInfo;
use crate::pagination;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Operations on one organization
#[derive(Debug, Clone)]
pub struct OrganizationApi {
    scope: Scope,
}

impl OrganizationApi {
    /// Handle for an organization
    pub fn new(http: Arc<HttpClient>, organization: impl Into<String>) -> Self {
        Self {
            scope: Scope::new(http, organization),
        }
    }

    /// Organization id
    pub fn id(&self) -> &str {
        self.scope.organization()
    }

    /// Every workspace in the organization
    pub async fn list_workspaces(&self) -> Result<Vec<WorkspaceInfo>> {
        pagination::fetch_all(self.scope.http(), "workspaces", self.scope.request()).await
    }

    /// First workspace matching the lookup
    pub async fn find_workspace(&self, lookup: Lookup<'_>) -> Result<Option<WorkspaceInfo>> {
        let workspaces = self.list_workspaces().await?;
        Ok(workspaces
            .into_iter()
            .find(|ws| lookup.matches(&ws.id, &ws.name)))
    }

    /// Create a workspace
    pub async fn create_workspace(&self, name: &str, description: &str) -> Result<WorkspaceApi> {
        let body = self
            .scope
            .http()
            .post(
                "workspaces",
                self.scope
                    .request()
                    .json(json!({ "name": name, "description": description })),
            )
            .await?;
        let id = decode::id_field("workspace", &body, "workspace_id")?;

        info!("Created workspace {} ({})", name, id);
        Ok(self.workspace(id))
    }

    /// The workspace with this name, created empty if none exists
    pub async fn create_workspace_if_not_exists(&self, name: &str) -> Result<WorkspaceApi> {
        if let Some(existing) = self.find_workspace(Lookup::Name(name)).await? {
            debug!("Workspace {} already exists ({})", name, existing.id);
            return Ok(self.workspace(existing.id));
        }
        self.create_workspace(name, "").await
    }

    /// Handle for a workspace; no request is made
    pub fn workspace(&self, workspace_id: impl Into<String>) -> WorkspaceApi {
        WorkspaceApi::new(self.scope.clone(), workspace_id)
    }
}
