//! Auth types
//!
//! Well-known names for the credential sources, the origin of each resolved
//! field, and the scheme used to attach the token to requests.

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Deep Intelligence SaaS instance
pub const DEFAULT_INSTANCE: &str = "app.deepint.net";

/// Environment variable holding the token
pub const TOKEN_ENV: &str = "DEEPINT_TOKEN";

/// Environment variable holding the organization id
pub const ORGANIZATION_ENV: &str = "DEEPINT_ORGANIZATION";

/// Environment variable holding the instance host
pub const INSTANCE_ENV: &str = "DEEPINT_INSTANCE";

/// Per-user config file name, looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".deepint.ini";

/// Section of the config file the credentials are read from
pub const CONFIG_SECTION: &str = "DEFAULT";

/// Header carrying the organization for organization-scoped requests
pub const ORGANIZATION_HEADER: &str = "x-deepint-organization";

/// Where a resolved credential field came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldOrigin {
    /// Passed explicitly by the caller
    Explicit,
    /// Read from a process environment variable
    Environment {
        /// The environment variable name
        var_name: String,
    },
    /// Read from the config file
    ConfigFile {
        /// Path or description of the config source
        location: String,
    },
    /// Built-in default
    Default,
    /// Not resolved by any source
    #[default]
    Unset,
}

impl FieldOrigin {
    /// Create an environment origin
    pub fn env(var_name: impl Into<String>) -> Self {
        FieldOrigin::Environment {
            var_name: var_name.into(),
        }
    }

    /// Create a config file origin
    pub fn config_file(location: impl Into<String>) -> Self {
        FieldOrigin::ConfigFile {
            location: location.into(),
        }
    }

    /// Whether a value was found
    pub fn is_set(&self) -> bool {
        !matches!(self, FieldOrigin::Unset)
    }
}

impl fmt::Display for FieldOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOrigin::Explicit => write!(f, "explicit"),
            FieldOrigin::Environment { var_name } => write!(f, "environment: ${var_name}"),
            FieldOrigin::ConfigFile { location } => write!(f, "config file: {location}"),
            FieldOrigin::Default => write!(f, "default"),
            FieldOrigin::Unset => write!(f, "unset"),
        }
    }
}

/// Origins of the three credential fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialOrigins {
    /// Origin of the token
    pub token: FieldOrigin,
    /// Origin of the organization
    pub organization: FieldOrigin,
    /// Origin of the instance
    pub instance: FieldOrigin,
}

/// How the token is attached to outgoing requests
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// Raw token in a named header (e.g. `x-auth-token`)
    Header {
        /// Header name
        name: String,
    },
}

impl AuthScheme {
    /// Create a raw header scheme
    pub fn header(name: impl Into<String>) -> Self {
        AuthScheme::Header { name: name.into() }
    }

    /// Attach the token to a request
    pub fn apply(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        match self {
            AuthScheme::Bearer => req.bearer_auth(token),
            AuthScheme::Header { name } => req.header(name.as_str(), token),
        }
    }
}
