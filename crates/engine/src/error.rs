//! Engine error taxonomy.
//!
//! Validation failures, missing/conflicting records and the reconciliation
//! rule each get their own variant so the server can map them to distinct
//! HTTP statuses.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("reconciliation failed: {0}")]
    Reconciliation(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Reconciliation(a), Self::Reconciliation(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
