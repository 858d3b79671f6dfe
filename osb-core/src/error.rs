//! Errors from the JSON columns embedded in result and specs rows.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// Stored blob is not valid JSON for the target shape
    #[error("could not decode {column}: {source}")]
    Decode {
        column: &'static str,
        source: serde_json::Error,
    },

    /// Value could not be serialized for storage
    #[error("could not encode {column}: {source}")]
    Encode {
        column: &'static str,
        source: serde_json::Error,
    },
}

impl CodecError {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Decode { column, .. } | Self::Encode { column, .. } => column,
        }
    }
}
