//! Error types for event unwrapping.

/// Failure of a single unwrap call.
///
/// Every variant is terminal: the engine stops at the point of detection and
/// leaves dead-lettering or acknowledgment to the caller.
#[derive(Debug, thiserror::Error)]
pub enum UnwrapError {
    /// Input is neither the target type nor a queue envelope.
    #[error("unable to unwrap event into expected type")]
    UnrecognizedShape,

    /// The queue envelope ran out of records.
    #[error("no records")]
    NoRecords,

    /// A record body is neither the target type nor a pub/sub envelope.
    #[error("unable to unwrap SNS message into expected type")]
    InvalidEnvelope,

    /// A pub/sub message decoded to something other than the target type.
    #[error("unable to unwrap event into expected type")]
    PayloadMismatch,

    /// A `body` or `Message` field was not valid JSON.
    #[error(transparent)]
    MalformedText(#[from] serde_json::Error),
}

/// Comparable discriminant of an [`UnwrapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognizedShape,
    NoRecords,
    InvalidEnvelope,
    PayloadMismatch,
    MalformedText,
}

impl UnwrapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedShape => ErrorKind::UnrecognizedShape,
            Self::NoRecords => ErrorKind::NoRecords,
            Self::InvalidEnvelope => ErrorKind::InvalidEnvelope,
            Self::PayloadMismatch => ErrorKind::PayloadMismatch,
            Self::MalformedText(_) => ErrorKind::MalformedText,
        }
    }
}

impl ErrorKind {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnrecognizedShape => "unrecognized_shape",
            Self::NoRecords => "no_records",
            Self::InvalidEnvelope => "invalid_envelope",
            Self::PayloadMismatch => "payload_mismatch",
            Self::MalformedText => "malformed_text",
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for unwrap calls.
pub type Result<T> = std::result::Result<T, UnwrapError>;
