//! Error types for the link registry and its stores
//!
//! `RegistryError` is the typed result every registry operation returns.
//! The routing layer turns it into a response using [`RegistryError::status_code`]
//! and [`RegistryError::error_code`].

use axum::http::StatusCode;
use thiserror::Error;

/// Failures raised by a [`LinkStore`](crate::store::LinkStore) backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same code already exists
    #[error("a link with this code already exists")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("stored record could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blocking task running the store call panicked or was cancelled
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<redb::DatabaseError> for StoreError {
    fn from(err: redb::DatabaseError) -> Self {
        Self::Database(err.into())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(err: redb::TransactionError) -> Self {
        Self::Database(err.into())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(err: redb::TableError) -> Self {
        Self::Database(err.into())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(err: redb::StorageError) -> Self {
        Self::Database(err.into())
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(err: redb::CommitError) -> Self {
        Self::Database(err.into())
    }
}

/// Everything a registry operation can report back to its caller
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("code must be 6-8 alphanumeric characters, got {0:?}")]
    InvalidFormat(String),

    /// The request body is not a JSON object
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("code {0:?} already exists")]
    CodeConflict(String),

    #[error("no link found for code {0:?}")]
    NotFound(String),

    #[error("could not find a free code after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The stored target no longer parses as an absolute URL
    #[error("stored target URL {target_url:?} for code {code:?} is invalid")]
    CorruptRecord { code: String, target_url: String },

    #[error(transparent)]
    Storage(StoreError),
}

impl RegistryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl(_) | Self::InvalidFormat(_) | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::CodeConflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Exhausted { .. } | Self::CorruptRecord { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Stable machine-readable code included in error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::InvalidFormat(_) => "invalid_code",
            Self::InvalidBody(_) => "invalid_body",
            Self::CodeConflict(_) => "code_conflict",
            Self::NotFound(_) => "not_found",
            Self::Exhausted { .. } => "exhausted",
            Self::CorruptRecord { .. } => "corrupt_record",
            Self::Storage(_) => "storage",
        }
    }

    /// True for conditions that are never the client's fault
    pub fn is_server_fault(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_api_contract() {
        assert_eq!(
            RegistryError::InvalidUrl("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistryError::InvalidFormat("ab".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistryError::InvalidBody("[]".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistryError::CodeConflict("abcdef".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RegistryError::NotFound("abcdef".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        let corrupt = RegistryError::CorruptRecord {
            code: "abcdef".into(),
            target_url: "nope".into(),
        };
        assert_eq!(corrupt.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(corrupt.is_server_fault());
        assert!(!RegistryError::NotFound("abcdef".into()).is_server_fault());
    }
}
