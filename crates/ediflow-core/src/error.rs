//! Error types for the Ediflow core library
//!
//! The matcher itself cannot fail. These errors belong to the collaborators
//! around it: fetching candidates and writing the related-record link back.

use thiserror::Error;

/// Main error type for Ediflow core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Candidate retrieval failed (query, transport, decoding)
    #[error("Candidate fetch failed for owner '{owner_id}': {message}")]
    CandidateFetch {
        owner_id: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The partial update of the originating record failed
    #[error("Failed to write field '{field}' on record '{record_id}': {message}")]
    RecordWrite {
        record_id: String,
        field: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a candidate fetch error without an underlying cause
    pub fn candidate_fetch(owner_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CandidateFetch {
            owner_id: owner_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a record write error without an underlying cause
    pub fn record_write(
        record_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RecordWrite {
            record_id: record_id.into(),
            field: field.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause to fetch and write errors
    pub fn with_source(self, cause: anyhow::Error) -> Self {
        match self {
            Self::CandidateFetch { owner_id, message, .. } => Self::CandidateFetch {
                owner_id,
                message,
                source: Some(cause),
            },
            Self::RecordWrite { record_id, field, message, .. } => Self::RecordWrite {
                record_id,
                field,
                message,
                source: Some(cause),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            message: source.to_string(),
            source,
        }
    }
}
