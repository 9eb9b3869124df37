//! Feature-extraction and vector-validation errors.

use super::error_code::{self, DriftwatchErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("feature vector has {found} entries, expected {expected}")]
    WrongLength { expected: usize, found: usize },

    #[error("feature {feature} is not finite ({value})")]
    NonFinite { feature: &'static str, value: f64 },
}

impl DriftwatchErrorCode for FeatureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongLength { .. } | Self::NonFinite { .. } => error_code::INVALID_VECTOR,
        }
    }
}
