//! Calls to endpoints the SDK does not wrap

use super::Scope;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination;
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use std::sync::Arc;
use tracing::debug;

/// Raw access to any API path, authenticated and scoped to an organization
#[derive(Debug, Clone)]
pub struct CustomEndpoint {
    scope: Scope,
}

impl CustomEndpoint {
    /// Custom endpoint caller for an organization
    pub fn new(http: Arc<HttpClient>, organization: impl Into<String>) -> Self {
        Self {
            scope: Scope::new(http, organization),
        }
    }

    /// Organization id sent with every call
    pub fn organization_id(&self) -> &str {
        self.scope.organization()
    }

    fn prepare(
        &self,
        method: &str,
        headers: StringMap,
        parameters: JsonObject,
    ) -> Result<(Method, RequestConfig)> {
        let method: Method = method.parse()?;
        let mut config = self.scope.request();
        for (key, value) in headers {
            config = config.header(key, value);
        }
        Ok((method, config.parameters(method, parameters)))
    }

    /// Perform one call.
    ///
    /// `method` is case-insensitive and limited to GET, POST, PUT and
    /// DELETE; anything else is rejected before a request is made.
    /// Parameters go in the query string for GET and in the JSON body
    /// otherwise.
    pub async fn call(
        &self,
        method: &str,
        path: &str,
        headers: StringMap,
        parameters: JsonObject,
    ) -> Result<JsonValue> {
        let (method, config) = self.prepare(method, headers, parameters)?;
        debug!("Custom call {} {}", method, path);
        self.scope.http().request(method, path, config).await
    }

    /// Perform a paginated call and collect the items of every page
    pub async fn call_paginated(
        &self,
        method: &str,
        path: &str,
        headers: StringMap,
        parameters: JsonObject,
    ) -> Result<Vec<JsonValue>> {
        let (method, config) = self.prepare(method, headers, parameters)?;
        debug!("Custom paginated call {} {}", method, path);
        pagination::collect_all(self.scope.http(), method, path, config).await
    }
}
