//! Entry point tying credentials, HTTP and the endpoint handles together

use crate::api::{CustomEndpoint, OrganizationApi, SourceApi, TaskApi, WorkspaceApi};
use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::locator::{self, ResourceKind};
use std::sync::Arc;

/// Deep Intelligence client
///
/// Cloning is cheap; clones share one connection pool and one set of
/// credentials.
#[derive(Debug, Clone)]
pub struct Client {
    http: Arc<HttpClient>,
}

impl Client {
    /// Client for already-resolved credentials
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, HttpClientConfig::default())
    }

    /// Client with a custom HTTP configuration
    pub fn with_config(credentials: Credentials, config: HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http: Arc::new(HttpClient::with_config(credentials, config)?),
        })
    }

    /// Client from the environment and `~/.deepint.ini`
    pub fn from_env() -> Result<Self> {
        Self::new(Credentials::build()?)
    }

    /// Credentials in use
    pub fn credentials(&self) -> &Credentials {
        self.http.credentials()
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// The organization from the credentials
    pub fn organization(&self) -> Result<OrganizationApi> {
        let organization = self.credentials().organization()?;
        Ok(self.organization_by_id(organization))
    }

    /// Any organization the token can access
    pub fn organization_by_id(&self, organization: impl Into<String>) -> OrganizationApi {
        OrganizationApi::new(Arc::clone(&self.http), organization)
    }

    /// Raw endpoint access scoped to the credentials' organization
    pub fn custom_endpoint(&self) -> Result<CustomEndpoint> {
        let organization = self.credentials().organization()?;
        Ok(CustomEndpoint::new(Arc::clone(&self.http), organization))
    }

    // ========================================================================
    // URL handles
    // ========================================================================

    /// Workspace handle from a web or API URL.
    ///
    /// API URLs carry no organization; it is taken from `organization`, then
    /// from the credentials.
    pub fn workspace_from_url(&self, url: &str, organization: Option<&str>) -> Result<WorkspaceApi> {
        let locator = locator::parse_url(url)?;
        let org = locator.organization_or(organization.or(self.credentials().organization_opt()))?;
        let workspace_id = locator.require_workspace()?;
        Ok(self.organization_by_id(org).workspace(workspace_id))
    }

    /// Source handle from a web or API URL
    pub fn source_from_url(&self, url: &str, organization: Option<&str>) -> Result<SourceApi> {
        let workspace = self.workspace_from_url(url, organization)?;
        let source_id = resource_id(url, ResourceKind::Source)?;
        Ok(workspace.source(source_id))
    }

    /// Task handle from a web or API URL
    pub fn task_from_url(&self, url: &str, organization: Option<&str>) -> Result<TaskApi> {
        let workspace = self.workspace_from_url(url, organization)?;
        let task_id = resource_id(url, ResourceKind::Task)?;
        Ok(workspace.task(task_id))
    }
}

fn resource_id(url: &str, kind: ResourceKind) -> Result<String> {
    let locator = locator::parse_url(url)?;
    locator.require_resource(kind).map(String::from)
}

impl TryFrom<Credentials> for Client {
    type Error = Error;

    fn try_from(credentials: Credentials) -> Result<Self> {
        Self::new(credentials)
    }
}
