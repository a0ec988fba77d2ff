//! Credentials and their resolution
//!
//! Each field is resolved independently, highest precedence first:
//!
//! 1. explicit value passed to the builder
//! 2. environment variable (`DEEPINT_TOKEN`, `DEEPINT_ORGANIZATION`, `DEEPINT_INSTANCE`)
//! 3. `[DEFAULT]` section of `~/.deepint.ini`
//! 4. built-in default (instance only)
//!
//! A missing token is not an error here; it surfaces as
//! [`Error::MissingCredentials`] the first time an authenticated call needs it.

use super::sources::{ConfigSource, ConfigValues, EnvSource, IniConfigFile, ProcessEnv};
use super::types::{
    CredentialOrigins, FieldOrigin, DEFAULT_INSTANCE, INSTANCE_ENV, ORGANIZATION_ENV, TOKEN_ENV,
};
use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Resolved Deep Intelligence credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: Option<String>,
    organization: Option<String>,
    instance: String,
    origins: CredentialOrigins,
}

impl Credentials {
    /// Start building credentials
    pub fn builder() -> CredentialsBuilder {
        CredentialsBuilder::default()
    }

    /// Resolve from the process environment and `~/.deepint.ini`
    pub fn build() -> Result<Self> {
        Self::builder().resolve()
    }

    /// Credentials with fixed values and no fallback lookup
    pub fn fixed(
        token: impl Into<String>,
        organization: Option<String>,
        instance: Option<String>,
    ) -> Self {
        let token = non_empty(Some(token.into()));
        let organization = non_empty(organization);
        let instance = non_empty(instance);

        let origins = CredentialOrigins {
            token: origin_if(token.is_some(), FieldOrigin::Explicit),
            organization: origin_if(organization.is_some(), FieldOrigin::Explicit),
            instance: if instance.is_some() {
                FieldOrigin::Explicit
            } else {
                FieldOrigin::Default
            },
        };

        Self {
            token,
            organization,
            instance: instance.unwrap_or_else(|| DEFAULT_INSTANCE.to_string()),
            origins,
        }
    }

    /// The token, or `MissingCredentials` if none was resolved
    pub fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| Error::missing_credentials("token"))
    }

    /// The organization, or `MissingCredentials` if none was resolved
    pub fn organization(&self) -> Result<&str> {
        self.organization
            .as_deref()
            .ok_or_else(|| Error::missing_credentials("organization"))
    }

    /// The organization if one was resolved
    pub fn organization_opt(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Whether a token was resolved
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Instance host (or URL, if the caller supplied a scheme)
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Where each field came from
    pub fn origins(&self) -> &CredentialOrigins {
        &self.origins
    }

    /// Same credentials scoped to another organization
    #[must_use]
    pub fn with_organization(&self, organization: impl Into<String>) -> Self {
        let mut creds = self.clone();
        creds.organization = non_empty(Some(organization.into()));
        creds.origins.organization = origin_if(creds.organization.is_some(), FieldOrigin::Explicit);
        creds
    }

    /// Root of the REST API, e.g. `https://app.deepint.net/api/v1/`
    pub fn api_base(&self) -> Result<Url> {
        let root = if self.instance.contains("://") {
            self.instance.clone()
        } else {
            format!("https://{}", self.instance)
        };
        let root = root.trim_end_matches('/');
        Ok(Url::parse(&format!("{root}/api/v1/"))?)
    }

    /// Token with everything but the last four characters masked
    pub fn redacted_token(&self) -> Option<String> {
        self.token.as_deref().map(redact)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.redacted_token())
            .field("organization", &self.organization)
            .field("instance", &self.instance)
            .field("origins", &self.origins)
            .finish()
    }
}

/// Builder that resolves credentials through the precedence chain
pub struct CredentialsBuilder {
    token: Option<String>,
    organization: Option<String>,
    instance: Option<String>,
    env: Box<dyn EnvSource>,
    config: Box<dyn ConfigSource>,
}

impl Default for CredentialsBuilder {
    fn default() -> Self {
        Self {
            token: None,
            organization: None,
            instance: None,
            env: Box::new(ProcessEnv),
            config: Box::new(IniConfigFile::default_location()),
        }
    }
}

impl CredentialsBuilder {
    /// Set an explicit token
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an explicit organization
    #[must_use]
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set an explicit instance
    #[must_use]
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set the optional explicit values in one go
    #[must_use]
    pub fn explicit(
        mut self,
        token: Option<String>,
        organization: Option<String>,
        instance: Option<String>,
    ) -> Self {
        self.token = token.or(self.token);
        self.organization = organization.or(self.organization);
        self.instance = instance.or(self.instance);
        self
    }

    /// Replace the environment source
    #[must_use]
    pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Replace the config source
    #[must_use]
    pub fn config(mut self, config: impl ConfigSource + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    /// Read the config from a specific INI file
    #[must_use]
    pub fn config_file(self, path: impl Into<PathBuf>) -> Self {
        self.config(IniConfigFile::at(path))
    }

    /// Resolve every field.
    ///
    /// Fails only if the config file exists but is invalid.
    pub fn resolve(self) -> Result<Credentials> {
        let mut token = self.pick("token", self.token.clone(), TOKEN_ENV);
        let mut organization = self.pick("organization", self.organization.clone(), ORGANIZATION_ENV);
        let mut instance = self.pick("instance", self.instance.clone(), INSTANCE_ENV);

        // The file is only consulted when something is still missing
        if token.is_none() || organization.is_none() || instance.is_none() {
            if let Some(file) = self.config.load()? {
                let location = self.config.location();
                let ConfigValues {
                    token: file_token,
                    organization: file_organization,
                    instance: file_instance,
                } = file;
                fill(&mut token, "token", file_token, &location);
                fill(&mut organization, "organization", file_organization, &location);
                fill(&mut instance, "instance", file_instance, &location);
            }
        }

        let (instance, instance_origin) = instance.unwrap_or_else(|| {
            debug!("Using default instance {}", DEFAULT_INSTANCE);
            (DEFAULT_INSTANCE.to_string(), FieldOrigin::Default)
        });

        if token.is_none() {
            debug!("No token resolved; authenticated calls will fail");
        }

        let (token, token_origin) = split(token);
        let (organization, organization_origin) = split(organization);

        Ok(Credentials {
            token,
            organization,
            instance,
            origins: CredentialOrigins {
                token: token_origin,
                organization: organization_origin,
                instance: instance_origin,
            },
        })
    }

    /// Explicit value first, then the environment
    fn pick(&self, field: &str, explicit: Option<String>, env_var: &str) -> Option<(String, FieldOrigin)> {
        if let Some(value) = non_empty(explicit) {
            debug!("Using explicit {}", field);
            return Some((value, FieldOrigin::Explicit));
        }

        if let Some(value) = non_empty(self.env.var(env_var)) {
            debug!("Found {} in environment variable {}", field, env_var);
            return Some((value, FieldOrigin::env(env_var)));
        }

        None
    }
}

fn fill(slot: &mut Option<(String, FieldOrigin)>, field: &str, value: Option<String>, location: &str) {
    if slot.is_some() {
        return;
    }
    if let Some(value) = non_empty(value) {
        debug!("Found {} in config file {}", field, location);
        *slot = Some((value, FieldOrigin::config_file(location)));
    }
}

fn split(slot: Option<(String, FieldOrigin)>) -> (Option<String>, FieldOrigin) {
    match slot {
        Some((value, origin)) => (Some(value), origin),
        None => (None, FieldOrigin::Unset),
    }
}

fn origin_if(present: bool, origin: FieldOrigin) -> FieldOrigin {
    if present {
        origin
    } else {
        FieldOrigin::Unset
    }
}

/// Trim, and treat blank values as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn redact(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
