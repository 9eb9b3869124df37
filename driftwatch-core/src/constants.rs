//! Shared constants.

/// Pipeline names matching this pattern are treated as test data.
/// Production mode refuses to analyze them; statistics exclude them.
pub const TEST_DATA_PATTERN: &str = r"(?i)test|sample|mock|dummy";

/// Model name used when a train request does not name one.
pub const DEFAULT_MODEL_NAME: &str = "baseline-model";

/// Request bodies above this size are rejected before JSON parsing.
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Minimum number of valid baseline runs a train request must carry.
pub const MIN_BASELINE_RUNS: usize = 2;

/// Floor applied to per-feature standard deviation during training.
/// Keeps z-scores finite for constant features.
pub const STD_DEV_FLOOR: f64 = 0.1;
