use reqwest::StatusCode;
use thiserror::Error;

use crate::data_models::BackendError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search request: {0}")]
    Validation(#[from] ValidationError),
    #[error("search transport failed: {0}")]
    Transport(#[from] TransportError),
    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("search request cancelled")]
    Cancelled,
}

/// Input rejected before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown season identifier {0:?}")]
    UnknownSeason(String),
    #[error("unknown query kind {0:?}, expected keywords, phrase or web")]
    UnknownKind(String),
    #[error("page size {0} out of range, expected 1 to 100")]
    InvalidPageSize(usize),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(
        "endpoint answered {status}: {}",
        .backend.as_ref().map(|b| b.msg.as_str()).unwrap_or("no error details")
    )]
    Status {
        status: StatusCode,
        backend: Option<BackendError>,
    },
    #[error("invalid endpoint url {0}")]
    InvalidEndpoint(String),
}

pub type SearchResult<T> = Result<T, SearchError>;
