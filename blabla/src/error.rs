use thiserror::Error;

/// Failure while turning a wire payload into a DTO.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{entity}: missing required key `{key}`")]
    MissingKey {
        entity: &'static str,
        key: &'static str,
    },

    #[error("{entity}: key `{key}` must be {expected}")]
    InvalidType {
        entity: &'static str,
        key: &'static str,
        expected: &'static str,
    },

    #[error("{entity}: expected a JSON object")]
    NotAnObject { entity: &'static str },

    #[error("{entity}: key `{key}` is not a valid UUID: {source}")]
    InvalidUuid {
        entity: &'static str,
        key: &'static str,
        #[source]
        source: uuid::Error,
    },

    #[error("{entity}: key `{key}` is not an RFC 3339 timestamp: {source}")]
    InvalidTimestamp {
        entity: &'static str,
        key: &'static str,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("File length mismatch: header says {expected} bytes, content has {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("File hash mismatch: header says {expected}, content hashes to {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Stable snake_case code carried in the `code` field of an error payload.
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::MissingKey { .. } => "missing_key",
            DecodeError::InvalidType { .. } => "invalid_type",
            DecodeError::NotAnObject { .. } => "not_an_object",
            DecodeError::InvalidUuid { .. } => "invalid_uuid",
            DecodeError::InvalidTimestamp { .. } => "invalid_timestamp",
            DecodeError::InvalidBase64(_) => "invalid_base64",
            DecodeError::LengthMismatch { .. } => "length_mismatch",
            DecodeError::HashMismatch { .. } => "hash_mismatch",
            DecodeError::Json(_) => "invalid_json",
        }
    }

    /// The wire key the failure is about, when there is one.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            DecodeError::MissingKey { key, .. }
            | DecodeError::InvalidType { key, .. }
            | DecodeError::InvalidUuid { key, .. }
            | DecodeError::InvalidTimestamp { key, .. } => Some(*key),
            DecodeError::InvalidBase64(_)
            | DecodeError::LengthMismatch { .. }
            | DecodeError::HashMismatch { .. } => Some("content"),
            DecodeError::NotAnObject { .. } | DecodeError::Json(_) => None,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SegmentError {
    #[error("response_id is already set to `{0}`")]
    ResponseIdAlreadySet(String),

    #[error("response_id must not be empty")]
    EmptyResponseId,
}

#[derive(Error, Debug)]
pub enum BlaBlaError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input too large: {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, BlaBlaError>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
