//! Baseline-model errors: training, persistence, validation.

use super::error_code::{self, DriftwatchErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("no baseline model named {name:?} — train one first")]
    NotFound { name: String },

    #[error("model file I/O failed: {message}")]
    Io { message: String },

    #[error("model serialization failed: {message}")]
    Serialization { message: String },

    #[error("model format version {found} is not loadable (expected {expected}); retrain required")]
    FormatVersion { expected: u32, found: u32 },

    #[error("model feature set mismatch: {detail}")]
    FeatureSet { detail: String },

    #[error("feature {feature} has negative standard deviation {std_dev}")]
    NegativeStdDev { feature: String, std_dev: f64 },

    #[error("training requires at least {required} valid baseline runs, got {valid}")]
    InsufficientTraining { required: usize, valid: usize },

    #[error("model store is locked: {message}")]
    Locked { message: String },
}

impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl DriftwatchErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::MODEL_NOT_FOUND,
            Self::Io { .. } | Self::Serialization { .. } => error_code::MODEL_IO,
            Self::FormatVersion { .. } | Self::FeatureSet { .. } | Self::NegativeStdDev { .. } => {
                error_code::MODEL_INVALID
            }
            Self::InsufficientTraining { .. } => error_code::TRAINING_DATA,
            Self::Locked { .. } => error_code::MODEL_LOCKED,
        }
    }
}
