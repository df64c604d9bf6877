//! Configuration for talking to the safe.
//!
//! Values come from an optional JSON file (by default `~/.picture_lock`)
//! and can be overridden from the command line:
//!
//! ```json
//! {
//!     "Safe": "safe.local",
//!     "User": "username",
//!     "Pass": "password"
//! }
//! ```
//!
//! Environment variables named like the keys (`Safe`, `User`, `Pass`,
//! `Timeout`) override the file, and flags override both.
//!
//! A safe address is mandatory; user and password are only needed if the
//! safe asks for them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::safe::Credentials;

/// Name of the config file in the home directory.
pub const CONFIG_FILE_NAME: &str = ".picture_lock";

/// Request timeout used when neither the file nor the flags set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No safe name passed")]
    MissingSafe,

    #[error("Config file {} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Error parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Contents of the JSON config file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigFile {
    #[serde(default)]
    pub safe: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
    /// Request timeout in seconds, 0 for none
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl ConfigFile {
    /// Path of the default config file, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Loads the default config file.
    ///
    /// A missing file (or unknown home directory) yields empty settings.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads a specific config file, which must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        log::debug!("Using configuration file {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Lets process environment variables override file values.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Overrides file values with whatever `lookup` returns for each key.
    ///
    /// Empty values are ignored, like empty flags.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(safe) = get("Safe") {
            self.safe = Some(safe);
        }
        if let Some(user) = get("User") {
            self.user = Some(user);
        }
        if let Some(pass) = get("Pass") {
            self.pass = Some(pass);
        }
        if let Some(timeout) = get("Timeout") {
            let secs = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "Timeout",
                    value: timeout.clone(),
                })?;
            self.timeout = Some(secs);
        }

        Ok(self)
    }

    /// Parses config file contents.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// Values given on the command line; they win over the file when non-empty.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub safe: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub timeout: Option<u64>,
}

/// Fully resolved, read-only settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credentials: Credentials,
    /// `None` means wait for the safe forever
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Merges command line overrides over the config file.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self, ConfigError> {
        let address = pick(overrides.safe, file.safe);
        if address.is_empty() {
            return Err(ConfigError::MissingSafe);
        }

        let timeout_secs = overrides
            .timeout
            .or(file.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self {
            credentials: Credentials {
                address,
                username: pick(overrides.user, file.user),
                password: pick(overrides.pass, file.pass),
            },
            timeout,
        })
    }
}

/// First non-empty value, or an empty string.
fn pick(flag: Option<String>, file: Option<String>) -> String {
    flag.filter(|v| !v.is_empty())
        .or(file.filter(|v| !v.is_empty()))
        .unwrap_or_default()
}
