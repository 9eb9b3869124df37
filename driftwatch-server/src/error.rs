//! API error mapping: every failure becomes `{error, code}` JSON with the
//! right status. Codes come from the core error-code registry so clients
//! can match on them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use driftwatch_core::errors::{
    DetectError, FeatureError, ModelError, NormalizeError, StorageError,
};
use driftwatch_core::DriftwatchErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request is missing the log document")]
    MissingLog,

    #[error("{message}")]
    Validation { message: String },

    #[error("limit must be between 1 and 1000, got {limit}")]
    InvalidLimit { limit: usize },

    #[error("filename must match pipeline-log-*.json")]
    InvalidFilename,

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("pipeline {pipeline:?} looks like test data and was rejected in production mode")]
    ProductionGuard { pipeline: String },

    #[error("training needs at least 2 valid baseline logs, got {valid}")]
    Training { valid: usize, errors: Vec<String> },

    #[error(transparent)]
    Parse(#[from] NormalizeError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingLog
            | Self::Validation { .. }
            | Self::InvalidLimit { .. }
            | Self::InvalidFilename
            | Self::ProductionGuard { .. }
            | Self::Training { .. }
            | Self::Parse(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Feature(_) | Self::Model(_) | Self::Detect(_) | Self::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingLog => "MISSING_LOG",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidLimit { .. } => "INVALID_LIMIT",
            Self::InvalidFilename => "INVALID_FILENAME",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ProductionGuard { .. } => "PRODUCTION_GUARD",
            Self::Training { .. } => "TRAINING_DATA",
            Self::Parse(e) => e.error_code(),
            Self::Feature(e) => e.error_code(),
            Self::Model(e) => e.error_code(),
            Self::Detect(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
        }
        let errors = match &self {
            Self::Training { errors, .. } if !errors.is_empty() => Some(errors.clone()),
            _ => None,
        };
        let body = ErrorBody { error: self.to_string(), code: self.code(), errors };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
