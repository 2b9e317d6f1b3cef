//! DNSSEC re-signing policy.
//!
//! [`SignatureConfig`] is the runtime value handed to the signing walk.
//! [`SignaturePolicyFile`] is its on-disk form, expressed in seconds so it
//! reads naturally in YAML, JSON and TOML.

use crate::{ConfigError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One day.
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest validity plus jitter that RRSIG serial arithmetic can order
/// (RFC 4034 section 3.1.5).
const MAX_SIGNATURE_SPAN: Duration = Duration::from_secs((1 << 31) - 1);

/// Timing policy for DNSSEC signatures.
///
/// The value is created once and only read afterwards; share it by
/// reference or wrap it in an `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureConfig {
    /// Validity period of the signatures, typically 2 to 4 weeks.
    pub validity: Duration,
    /// How much validity may remain before a signature is refreshed.
    pub refresh: Duration,
    /// Amount of time randomly added to or subtracted from the expiration
    /// so signatures do not all expire at once.
    pub jitter: Duration,
    /// Subtracted from the inception time to tolerate skewed validator
    /// clocks.
    pub inception_offset: Duration,
}

impl Default for SignatureConfig {
    /// Validity 4 weeks, refresh 3 days, jitter 12 hours, inception
    /// offset 300 seconds.
    fn default() -> Self {
        Self {
            validity: DAY * 28,
            refresh: DAY * 3,
            jitter: Duration::from_secs(12 * 60 * 60),
            inception_offset: Duration::from_secs(300),
        }
    }
}

impl SignatureConfig {
    /// Checks that the durations describe a usable signing window.
    pub fn validate(&self) -> Result<()> {
        if self.validity.is_zero() {
            return Err(ConfigError::invalid_value(
                "validity",
                "must be greater than zero",
            ));
        }
        if self.refresh >= self.validity {
            return Err(ConfigError::invalid_value(
                "refresh",
                "must be shorter than the validity period",
            ));
        }
        if self.jitter >= self.validity {
            return Err(ConfigError::invalid_value(
                "jitter",
                "must be shorter than the validity period",
            ));
        }
        if self.inception_offset >= self.validity {
            return Err(ConfigError::invalid_value(
                "inception_offset",
                "must be shorter than the validity period",
            ));
        }
        if self.validity.saturating_add(self.jitter) > MAX_SIGNATURE_SPAN {
            return Err(ConfigError::invalid_value(
                "validity",
                format!(
                    "with jitter must not exceed {} seconds",
                    MAX_SIGNATURE_SPAN.as_secs()
                ),
            ));
        }
        Ok(())
    }

    /// Inception time for signatures made at `now`.
    ///
    /// # Errors
    ///
    /// Fails if the result falls outside the range of [`DateTime`].
    pub fn inception(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_sub_signed(delta(self.inception_offset))
            .ok_or_else(|| out_of_range("inception_offset", now))
    }

    /// Expiration time for signatures made at `now`, with a random jitter
    /// drawn uniformly from `[-jitter, +jitter]`.
    ///
    /// # Errors
    ///
    /// Fails if the result falls outside the range of [`DateTime`].
    pub fn expiration(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let bound = i64::try_from(self.jitter.as_secs()).unwrap_or(i64::MAX);
        let offset = if bound == 0 {
            0
        } else {
            rand::thread_rng().gen_range(-bound..=bound)
        };
        self.expiration_with_jitter(now, offset)
    }

    /// Expiration time for signatures made at `now`, shifted by
    /// `jitter_secs` (clamped to the configured jitter).
    ///
    /// # Errors
    ///
    /// Fails if the result falls outside the range of [`DateTime`].
    pub fn expiration_with_jitter(
        &self,
        now: DateTime<Utc>,
        jitter_secs: i64,
    ) -> Result<DateTime<Utc>> {
        let bound = i64::try_from(self.jitter.as_secs()).unwrap_or(i64::MAX);
        let jitter = TimeDelta::try_seconds(jitter_secs.clamp(-bound, bound))
            .unwrap_or(TimeDelta::zero());
        now.checked_add_signed(delta(self.validity))
            .and_then(|expiration| expiration.checked_add_signed(jitter))
            .ok_or_else(|| out_of_range("validity", now))
    }

    /// Returns true if a signature expiring at `expiration` should be
    /// replaced at `now`.
    pub fn needs_refresh(&self, expiration: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        expiration - now <= delta(self.refresh)
    }
}

fn out_of_range(field: &str, now: DateTime<Utc>) -> ConfigError {
    ConfigError::invalid_value(field, format!("signing window from {now} is out of range"))
}

/// Converts a policy duration, saturating at the largest representable delta.
fn delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

/// Serializable form of [`SignatureConfig`], in seconds.
///
/// Missing fields take the defaults of [`SignatureConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignaturePolicyFile {
    /// Signature validity period.
    pub validity_secs: u64,
    /// Refresh window before expiration.
    pub refresh_secs: u64,
    /// Maximum random expiration jitter.
    pub jitter_secs: u64,
    /// Inception backdating.
    pub inception_offset_secs: u64,
}

impl Default for SignaturePolicyFile {
    fn default() -> Self {
        SignatureConfig::default().into()
    }
}

impl From<SignatureConfig> for SignaturePolicyFile {
    fn from(config: SignatureConfig) -> Self {
        Self {
            validity_secs: config.validity.as_secs(),
            refresh_secs: config.refresh.as_secs(),
            jitter_secs: config.jitter.as_secs(),
            inception_offset_secs: config.inception_offset.as_secs(),
        }
    }
}

impl TryFrom<SignaturePolicyFile> for SignatureConfig {
    type Error = ConfigError;

    fn try_from(file: SignaturePolicyFile) -> Result<Self> {
        let config = Self {
            validity: Duration::from_secs(file.validity_secs),
            refresh: Duration::from_secs(file.refresh_secs),
            jitter: Duration::from_secs(file.jitter_secs),
            inception_offset: Duration::from_secs(file.inception_offset_secs),
        };
        config.validate()?;
        Ok(config)
    }
}
