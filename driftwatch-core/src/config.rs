//! Service configuration.
//!
//! Every knob is optional with a sensible default; `from_env()` reads the
//! documented environment variables and leaves unset fields as `None` so the
//! `effective_*()` accessors apply defaults in one place.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the driftwatch service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DriftwatchConfig {
    /// HTTP listen port. Default: 8080.
    pub port: Option<u16>,
    /// CORS allowlist origin. Default: none (permissive).
    pub frontend_url: Option<String>,
    /// Runtime environment. "production" enables the test-data gate.
    pub environment: Option<String>,
    /// Log filter level: DEBUG, INFO, WARN, ERROR. Default: INFO.
    pub log_level: Option<String>,
    /// Root data directory. Default: "./data".
    pub data_dir: Option<PathBuf>,
    /// SQLite database path. Default: `<data_dir>/driftwatch.db`.
    pub db_path: Option<PathBuf>,
    /// Baseline model directory. Default: `<data_dir>/models`.
    pub model_dir: Option<PathBuf>,
    /// Pipeline log file directory. Default: `<data_dir>/pipeline-logs`.
    pub logs_dir: Option<PathBuf>,
    /// External anomaly scorer endpoint. Unset → statistical scorer.
    pub scorer_url: Option<String>,
    /// Per-attempt scorer timeout in milliseconds. Default: 5000.
    pub scorer_timeout_ms: Option<u64>,
    /// Scorer retry attempts. Default: 3.
    pub scorer_retries: Option<u32>,
    /// Request body ceiling in bytes. Default: 10 MiB.
    pub max_body_bytes: Option<usize>,
}

impl DriftwatchConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT"),
            frontend_url: env_string("FRONTEND_URL"),
            environment: env_string("DRIFTWATCH_ENV"),
            log_level: env_string("LOG_LEVEL"),
            data_dir: env_string("DRIFTWATCH_DATA_DIR").map(PathBuf::from),
            db_path: env_string("DRIFTWATCH_DB_PATH").map(PathBuf::from),
            model_dir: env_string("DRIFTWATCH_MODEL_DIR").map(PathBuf::from),
            logs_dir: env_string("DRIFTWATCH_LOGS_DIR").map(PathBuf::from),
            scorer_url: env_string("DRIFTWATCH_SCORER_URL"),
            scorer_timeout_ms: env_parse("DRIFTWATCH_SCORER_TIMEOUT_MS"),
            scorer_retries: env_parse("DRIFTWATCH_SCORER_RETRIES"),
            max_body_bytes: env_parse("DRIFTWATCH_MAX_BODY_BYTES"),
        }
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(8080)
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("INFO")
    }

    /// Whether production safety (test-data rejection) is active.
    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some("production")
    }

    pub fn effective_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("./data"))
    }

    pub fn effective_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.effective_data_dir().join("driftwatch.db"))
    }

    pub fn effective_model_dir(&self) -> PathBuf {
        self.model_dir
            .clone()
            .unwrap_or_else(|| self.effective_data_dir().join("models"))
    }

    pub fn effective_logs_dir(&self) -> PathBuf {
        self.logs_dir
            .clone()
            .unwrap_or_else(|| self.effective_data_dir().join("pipeline-logs"))
    }

    pub fn effective_scorer_timeout_ms(&self) -> u64 {
        self.scorer_timeout_ms.unwrap_or(5_000)
    }

    pub fn effective_scorer_retries(&self) -> u32 {
        self.scorer_retries.unwrap_or(3)
    }

    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes
            .unwrap_or(crate::constants::MAX_REQUEST_BODY_BYTES)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = DriftwatchConfig::default();
        assert_eq!(config.effective_port(), 8080);
        assert_eq!(config.effective_log_level(), "INFO");
        assert!(!config.is_production());
        assert_eq!(config.effective_db_path(), PathBuf::from("./data/driftwatch.db"));
        assert_eq!(config.effective_scorer_retries(), 3);
        assert_eq!(config.effective_max_body_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn production_flag() {
        let config = DriftwatchConfig {
            environment: Some("production".to_string()),
            ..Default::default()
        };
        assert!(config.is_production());
    }
}
