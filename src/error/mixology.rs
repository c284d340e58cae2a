use reqwest::StatusCode;
use thiserror::Error as ThisError;

use super::IsRetryable;

#[derive(Debug, ThisError)]
pub enum MixologyError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} already exists: {name}")]
    DuplicateKey { kind: &'static str, name: String },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Coarse failure buckets callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    DuplicateKey,
    StorageFailure,
    NetworkFailure,
    DecodeFailure,
}

impl MixologyError {
    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        MixologyError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            MixologyError::NotFound { .. } => ErrorClass::NotFound,
            MixologyError::DuplicateKey { .. } => ErrorClass::DuplicateKey,
            MixologyError::DatabaseError(_) | MixologyError::RactorError(_) => {
                ErrorClass::StorageFailure
            }
            MixologyError::UpstreamStatus(_)
            | MixologyError::ReqwestError(_)
            | MixologyError::UrlError(_) => ErrorClass::NetworkFailure,
            // reqwest reports body decoding through its own error type, but the
            // search client decodes with serde_json, so only this variant lands here.
            MixologyError::JsonError(_) => ErrorClass::DecodeFailure,
        }
    }
}

impl IsRetryable for MixologyError {
    fn is_retryable(&self) -> bool {
        match self {
            MixologyError::ReqwestError(e) => !e.is_builder() && !e.is_decode(),
            MixologyError::UpstreamStatus(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
