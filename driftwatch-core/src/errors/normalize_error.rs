//! Normalizer errors.
//!
//! The normalizer is total over well-formed JSON documents: missing fields
//! are synthesized, never errors. Only non-JSON input or a document that is
//! neither object nor array fails.

use super::error_code::{self, DriftwatchErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("log document must be a JSON object or array, found {found}")]
    NotADocument { found: &'static str },
}

impl DriftwatchErrorCode for NormalizeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidJson { .. } => error_code::PARSE_ERROR,
            Self::NotADocument { .. } => error_code::NOT_A_DOCUMENT,
        }
    }
}
