//! Drift-detector errors.

use super::error_code::{self, DriftwatchErrorCode};
use super::feature_error::FeatureError;
use super::model_error::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error(transparent)]
    InvalidVector(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("external scorer unreachable after {attempts} attempts: {message}")]
    ScorerUnreachable { attempts: u32, message: String },

    #[error("external scorer returned an unusable response: {message}")]
    ScorerResponse { message: String },
}

impl DriftwatchErrorCode for DetectError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidVector(e) => e.error_code(),
            Self::Model(e) => e.error_code(),
            Self::ScorerUnreachable { .. } => error_code::SCORER_UNREACHABLE,
            Self::ScorerResponse { .. } => error_code::SCORER_RESPONSE,
        }
    }
}
