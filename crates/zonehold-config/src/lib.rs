//! # Zonehold Configuration
//!
//! Configuration for a zonehold zone store:
//!
//! - [`SignatureConfig`]: DNSSEC re-signing timing policy
//! - [`ZoneConfig`]: zone origin, signing policy and logging, loadable from
//!   YAML, JSON or TOML
//! - [`logging`]: tracing subscriber setup
//!
//! ## Example
//!
//! ```rust
//! use zonehold_config::ZoneConfig;
//!
//! let config = ZoneConfig::from_yaml("origin: example.com.\nsigning:\n  jitter_secs: 3600\n").unwrap();
//! config.validate().unwrap();
//! let policy = config.signature_config().unwrap();
//! assert_eq!(policy.jitter.as_secs(), 3600);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;
pub mod policy;

pub use logging::{LogConfig, LogFormat};
pub use policy::{SignatureConfig, SignaturePolicyFile};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use zonehold_proto::Name;

/// Why a configuration could not be loaded or used.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The document does not parse as its format.
    #[error("{format} document is malformed: {message}")]
    Syntax {
        /// Format the document was read as.
        format: ConfigFormat,
        /// Parser message.
        message: String,
    },

    /// A setting holds an unusable value.
    #[error("{field} = {message}")]
    InvalidValue {
        /// Offending setting.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Global state the configuration installs was already set.
    #[error("{0}")]
    Install(String),
}

impl ConfigError {
    /// An [`ConfigError::InvalidValue`].
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    fn syntax(format: ConfigFormat, err: impl std::fmt::Display) -> Self {
        Self::Syntax {
            format,
            message: err.to_string(),
        }
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Document formats a [`ZoneConfig`] can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML; the default for unknown extensions.
    Yaml,
    /// JSON.
    Json,
    /// TOML.
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        })
    }
}

/// Configuration for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Zone origin in presentation format; empty or `.` for the root.
    pub origin: String,

    /// DNSSEC signing policy. Absent means the default policy.
    pub signing: Option<SignaturePolicyFile>,

    /// Logging configuration.
    pub logging: LogConfig,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            origin: ".".to_string(),
            signing: None,
            logging: LogConfig::default(),
        }
    }
}

impl ZoneConfig {
    /// Reads a file, choosing the format by its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, ConfigFormat::from_path(path))
    }

    /// Parses a document in the given format.
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| ConfigError::syntax(format, e)),
            ConfigFormat::Json => serde_json::from_str(text).map_err(|e| ConfigError::syntax(format, e)),
            ConfigFormat::Toml => toml::from_str(text).map_err(|e| ConfigError::syntax(format, e)),
        }
    }

    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::parse(yaml, ConfigFormat::Yaml)
    }

    /// Renders the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::syntax(ConfigFormat::Yaml, e))
    }

    /// Validates the origin, the signing policy and the log level.
    pub fn validate(&self) -> Result<()> {
        self.origin_name()?;
        self.signature_config()?;
        self.logging.level()?;
        Ok(())
    }

    /// Parses the origin.
    pub fn origin_name(&self) -> Result<Name> {
        Name::from_str(&self.origin)
            .map_err(|e| ConfigError::invalid_value("origin", e.to_string()))
    }

    /// Returns the validated signing policy.
    pub fn signature_config(&self) -> Result<SignatureConfig> {
        self.signing
            .map_or_else(|| Ok(SignatureConfig::default()), SignatureConfig::try_from)
    }
}
