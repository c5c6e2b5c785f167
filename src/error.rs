//! Error types for the ingestion boundary, the service layer and config.
//!
//! The pure engine in `shuffle_engine` is total and never returns these.

use thiserror::Error;

/// A stored card record that cannot become a [`Card`](crate::shuffle_engine::models::Card).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("card record has no suit")]
    MissingSuit,
    #[error("card record has no value")]
    MissingValue,
    #[error("unknown suit: {0}")]
    UnknownSuit(String),
    #[error("unknown card value: {0}")]
    UnknownValue(String),
    #[error("duplicate card in deck: {0}")]
    DuplicateCard(String),
    #[error("deck must hold 52 unique cards, found {found}")]
    IncompleteDeck { found: usize },
}

/// Failures reported by a persistence collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("shuffle not found: {0}")]
    ShuffleNotFound(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    RateLimited,
    NotFound,
    Forbidden,
    Store,
    InvalidData,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("sign in required to {action}")]
    Unauthenticated { action: &'static str },
    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("shuffle {0} not found")]
    ShuffleNotFound(String),
    #[error("shuffle {0} belongs to another user")]
    Forbidden(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    InvalidData(#[from] IngestError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            ServiceError::RateLimited { .. } => ErrorKind::RateLimited,
            ServiceError::ShuffleNotFound(_) => ErrorKind::NotFound,
            ServiceError::Forbidden(_) => ErrorKind::Forbidden,
            ServiceError::Store(StoreError::ShuffleNotFound(_)) => ErrorKind::NotFound,
            ServiceError::Store(_) => ErrorKind::Store,
            ServiceError::InvalidData(_) => ErrorKind::InvalidData,
        }
    }

    /// Whether retrying the same call later can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ServiceError::RateLimited { .. } => true,
            ServiceError::Store(StoreError::Unavailable(_)) => true,
            ServiceError::Unauthenticated { .. }
            | ServiceError::ShuffleNotFound(_)
            | ServiceError::Forbidden(_)
            | ServiceError::Store(_)
            | ServiceError::InvalidData(_) => false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },
}
