//! # driftwatch-core
//!
//! Foundation crate for the driftwatch drift-detection service.
//! Defines the canonical pipeline types, the frozen feature vector,
//! baseline-model and analysis types, per-layer errors, and configuration.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::DriftwatchConfig;
pub use errors::error_code::DriftwatchErrorCode;
pub use types::analysis::{Analysis, Issue, IssueType, RiskLevel, Severity};
pub use types::diff::{DiffStatus, DiffStep, PipelineDiff};
pub use types::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use types::model::{BaselineModel, FeatureStats, MODEL_FORMAT_VERSION};
pub use types::run::{PipelineRun, PipelineStep, StepType};
