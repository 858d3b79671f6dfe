//! Database error type

use std::time::Duration;

use osb_core::CodecError;

/// Errors raised by the database access layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Backing store unreachable when opening the handle
    #[error("could not establish a good connection to {address}: {source}")]
    Connection {
        address: String,
        source: sqlx::Error,
    },

    #[error("invalid database address {0:?}, expected host:port")]
    Address(String),

    #[error("prepare {statement}: {source}")]
    Prepare {
        statement: &'static str,
        source: sqlx::Error,
    },

    #[error("statement {0} not found")]
    StatementNotFound(&'static str),

    /// Row shape does not match the record
    #[error("could not read {resource} row: {source}")]
    Scan {
        resource: &'static str,
        source: sqlx::Error,
    },

    /// JSON column could not be decoded or encoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{statement} timed out after {after:?}")]
    Timeout {
        statement: &'static str,
        after: Duration,
    },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
