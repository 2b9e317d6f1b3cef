//! Zone store errors.

use thiserror::Error;
use zonehold_config::ConfigError;
use zonehold_proto::Name;

/// Errors that can occur during zone operations.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// Record owner is not at or below the zone origin.
    #[error("{name} is out of zone {origin}")]
    OutOfZone {
        /// The offending owner name.
        name: Name,
        /// The zone origin.
        origin: Name,
    },

    /// Zone origin could not be parsed.
    #[error("invalid zone origin {name:?}")]
    InvalidOrigin {
        /// The origin as given.
        name: String,
        /// Why it was rejected.
        #[source]
        source: zonehold_proto::Error,
    },

    /// Signing was refused or the signer failed.
    #[error("signing error: {message}")]
    Signing {
        /// Description of the error.
        message: String,
    },

    /// Signature policy is unusable.
    #[error("invalid signature policy: {message}")]
    InvalidPolicy {
        /// Description of the error.
        message: String,
    },

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] zonehold_proto::Error),
}

impl ZoneError {
    /// Creates an out-of-zone error.
    pub fn out_of_zone(name: &Name, origin: &Name) -> Self {
        Self::OutOfZone {
            name: name.clone(),
            origin: origin.clone(),
        }
    }

    /// Creates a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by the caller's input rather
    /// than by the signer.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::OutOfZone { .. } | Self::InvalidOrigin { .. } | Self::InvalidPolicy { .. }
        )
    }
}

impl From<ConfigError> for ZoneError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidPolicy {
            message: err.to_string(),
        }
    }
}

/// Result type for zone operations.
pub type Result<T> = std::result::Result<T, ZoneError>;
