//! Authentication module
//!
//! Resolves the token / organization / instance triple used by every API
//! call, and attaches it to outgoing requests.
//!
//! Sources are injected ([`EnvSource`], [`ConfigSource`]); the defaults read
//! the process environment and `~/.deepint.ini`.

mod credentials;
mod sources;
mod types;

pub use credentials::{Credentials, CredentialsBuilder};
pub use sources::{
    ConfigSource, ConfigValues, EnvSource, IniConfigFile, MapEnv, ProcessEnv, StaticConfig,
};
pub use types::{
    AuthScheme, CredentialOrigins, FieldOrigin, CONFIG_FILE_NAME, CONFIG_SECTION,
    DEFAULT_INSTANCE, INSTANCE_ENV, ORGANIZATION_ENV, ORGANIZATION_HEADER, TOKEN_ENV,
};

#[cfg(test)]
mod tests;
