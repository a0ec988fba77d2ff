//! HTTP client for the Deep Intelligence API
//!
//! Handles:
//! - Base URL derived from the resolved instance
//! - Token and organization headers
//! - Parameters as query (GET) or JSON body (other methods)
//! - Status classification into [`Error::Api`]
//!
//! There is no retry. Transport errors pass through unchanged.

use crate::auth::{AuthScheme, Credentials, ORGANIZATION_HEADER};
use crate::decode::{self, Record};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
    /// How the token is attached
    pub auth_scheme: AuthScheme,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Some(Duration::from_secs(10)),
            default_headers: StringMap::new(),
            user_agent: format!("deepint-rust/{}", env!("CARGO_PKG_VERSION")),
            auth_scheme: AuthScheme::default(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the auth scheme
    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.config.auth_scheme = scheme;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Organization sent in `x-deepint-organization`
    pub organization: Option<String>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Scope the request to an organization
    #[must_use]
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach call parameters: query string for GET, JSON body otherwise.
    ///
    /// Query values are sent as-is for strings and as JSON text otherwise.
    #[must_use]
    pub fn parameters(mut self, method: Method, parameters: JsonObject) -> Self {
        if parameters.is_empty() {
            return self;
        }
        match method {
            Method::GET => {
                for (key, value) in parameters {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    self.query.insert(key, value);
                }
            }
            _ => self.body = Some(Value::Object(parameters)),
        }
        self
    }
}

/// HTTP client bound to one set of credentials
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    credentials: Arc<Credentials>,
    base_url: Url,
}

impl HttpClient {
    /// Create a client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(credentials: Credentials, config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let client = builder.build()?;
        let base_url = credentials.api_base()?;

        Ok(Self {
            client,
            config,
            credentials: Arc::new(credentials),
            base_url,
        })
    }

    /// The credentials attached to every request
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// API root, e.g. `https://app.deepint.net/api/v1/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Build full URL from a path relative to the API root
    pub fn url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, config: RequestConfig) -> Result<JsonValue> {
        self.request(Method::GET, path, config).await
    }

    /// Make a POST request
    pub async fn post(&self, path: &str, config: RequestConfig) -> Result<JsonValue> {
        self.request(Method::POST, path, config).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str, config: RequestConfig) -> Result<JsonValue> {
        self.request(Method::DELETE, path, config).await
    }

    /// Make a request and return the JSON body (`Null` if empty)
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<JsonValue> {
        // Fails before any network attempt
        let token = self.credentials.token()?;
        let url = self.url(path)?;

        let mut req = self.client.request(method.into(), url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(ref organization) = config.organization {
            req = req.header(ORGANIZATION_HEADER, organization.as_str());
        }
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }
        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }
        req = self.config.auth_scheme.apply(req, token);

        debug!("Sending {} {}", method, url);
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = api_error(status, method, &url, &text);
            warn!("{}", err);
            return Err(err);
        }

        debug!("Request succeeded: {} {} ({})", method, url, status.as_u16());

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::malformed("response body", e.to_string()))
    }

    /// Make a request and map the body into a typed record
    pub async fn request_record<T: Record>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let body = self.request(method, path, config).await?;
        decode::decode(body)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Build an API error from a non-success response.
///
/// The platform reports failures as `{"code": ..., "message": ...}`.
fn api_error(status: StatusCode, method: Method, url: &Url, body: &str) -> Error {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(|c| match c {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("HTTP_{}", status.as_u16()));

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body.trim().to_string()
            }
        });

    Error::Api {
        status: status.as_u16(),
        code,
        message,
        method: method.to_string(),
        url: url.to_string(),
    }
}
