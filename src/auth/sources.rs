//! Injectable credential sources
//!
//! The resolver never touches `std::env` or the filesystem directly; it reads
//! through [`EnvSource`] and [`ConfigSource`] so tests can substitute fakes.

use super::types::{CONFIG_FILE_NAME, CONFIG_SECTION};
use crate::error::{Error, Result};
use ini::{Ini, ParseOption};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

// ============================================================================
// Environment
// ============================================================================

/// Source of environment variables
pub trait EnvSource: Send + Sync {
    /// Look up a variable
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Config file
// ============================================================================

/// Credential values found in a config source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigValues {
    /// API token
    pub token: Option<String>,
    /// Organization id
    pub organization: Option<String>,
    /// API host
    pub instance: Option<String>,
}

impl ConfigValues {
    /// Parse the `[DEFAULT]` section of an INI document.
    ///
    /// `path` is only used for error reporting.
    pub fn parse_ini(content: &str, path: &Path) -> Result<Self> {
        // Values are kept raw: no escape sequences, no quote stripping
        let options = ParseOption {
            enabled_escape: false,
            enabled_quote: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options)
            .map_err(|e| Error::invalid_config(path, e.to_string()))?;

        let section = ini.section(Some(CONFIG_SECTION)).ok_or_else(|| {
            Error::invalid_config(path, format!("missing [{CONFIG_SECTION}] section"))
        })?;

        // Keys are matched case-insensitively
        let get = |key: &str| {
            section
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.to_string())
        };

        Ok(Self {
            token: get("token"),
            organization: get("organization"),
            instance: get("instance"),
        })
    }
}

/// Source of config file values
pub trait ConfigSource: Send + Sync {
    /// Load the values. `Ok(None)` means no config is present.
    fn load(&self) -> Result<Option<ConfigValues>>;

    /// Human-readable location, used for field origins
    fn location(&self) -> String;
}

/// INI config file on disk (`~/.deepint.ini` by default)
#[derive(Debug, Clone)]
pub struct IniConfigFile {
    path: Option<PathBuf>,
}

impl IniConfigFile {
    /// The per-user file in the home directory
    pub fn default_location() -> Self {
        Self {
            path: dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME)),
        }
    }

    /// A file at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Path of the file, if a home directory could be determined
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for IniConfigFile {
    fn default() -> Self {
        Self::default_location()
    }
}

impl ConfigSource for IniConfigFile {
    fn load(&self) -> Result<Option<ConfigValues>> {
        let Some(path) = &self.path else {
            debug!("No home directory, skipping config file lookup");
            return Ok(None);
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Config file {} not present", path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::invalid_config(path, e.to_string())),
        };

        debug!("Reading credentials from {}", path.display());
        ConfigValues::parse_ini(&content, path).map(Some)
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => format!("~/{CONFIG_FILE_NAME}"),
        }
    }
}

/// Fixed config values held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    values: Option<ConfigValues>,
}

impl StaticConfig {
    /// Config with the given values
    pub fn new(values: ConfigValues) -> Self {
        Self {
            values: Some(values),
        }
    }

    /// No config present
    pub fn empty() -> Self {
        Self { values: None }
    }
}

impl ConfigSource for StaticConfig {
    fn load(&self) -> Result<Option<ConfigValues>> {
        Ok(self.values.clone())
    }

    fn location(&self) -> String {
        "static config".to_string()
    }
}
