//! Configuration types.

use std::env::{self, VarError};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Environment variable selecting [`RecordMatch`].
pub const RECORD_MATCH_ENV: &str = "EVENT_UNWRAP_RECORD_MATCH";
/// Environment variable selecting [`DrainPolicy`].
pub const DRAIN_ENV: &str = "EVENT_UNWRAP_DRAIN";

/// How a single queue record is matched once its body has been decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordMatch {
    /// A body that is already the target type is yielded and then still
    /// checked as a pub/sub envelope. A plain body therefore fails with
    /// `InvalidEnvelope` if the consumer keeps pulling.
    #[default]
    Exhaustive,
    /// A body that is already the target type ends that record; the next
    /// pull moves on to the following record.
    FirstMatch,
}

/// What `unwrap_all` does with the terminal `NoRecords` of an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainPolicy {
    /// `NoRecords` after at least one payload ends the sequence normally.
    #[default]
    Lenient,
    /// Every terminal error propagates, even after payloads were collected.
    Strict,
}

/// Unwrapper configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwrapConfig {
    /// Per-record matching behavior.
    pub record_match: RecordMatch,
    /// Terminal-error handling for `unwrap_all`.
    pub drain: DrainPolicy,
}

impl UnwrapConfig {
    /// Build a configuration from `EVENT_UNWRAP_*` environment variables.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            record_match: env_value(RECORD_MATCH_ENV)?.unwrap_or_default(),
            drain: env_value(DRAIN_ENV)?.unwrap_or_default(),
        })
    }

    pub fn with_record_match(mut self, record_match: RecordMatch) -> Self {
        self.record_match = record_match;
        self
    }

    pub fn with_drain(mut self, drain: DrainPolicy) -> Self {
        self.drain = drain;
        self
    }
}

/// Parse `key` from the environment; `None` when unset.
fn env_value<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
{
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    match env::var(key) {
        Ok(raw) => raw.parse().map(Some).map_err(invalid),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(invalid("value is not valid unicode".to_string())),
    }
}

impl FromStr for RecordMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exhaustive" => Ok(Self::Exhaustive),
            "first_match" | "first-match" => Ok(Self::FirstMatch),
            other => Err(format!("unknown record match mode: {other}")),
        }
    }
}

impl fmt::Display for RecordMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhaustive => f.write_str("exhaustive"),
            Self::FirstMatch => f.write_str("first_match"),
        }
    }
}

impl FromStr for DrainPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown drain policy: {other}")),
        }
    }
}

impl fmt::Display for DrainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}
