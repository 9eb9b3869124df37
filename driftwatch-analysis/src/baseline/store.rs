//! Model persistence: one JSON file per named model, replaced atomically.
//!
//! Writers take an exclusive advisory lock and publish via temp file +
//! rename, so concurrent readers always observe either the old model or the
//! new one, never a partial file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;

use driftwatch_core::constants::DEFAULT_MODEL_NAME;
use driftwatch_core::errors::model_error::ModelError;
use driftwatch_core::types::model::BaselineModel;

/// Directory-backed store of named baseline models.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// Open (creating if needed) a model directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the JSON file backing a named model.
    pub fn model_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_name(name)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.model_path(name).is_file()
    }

    /// Load and validate a named model.
    pub fn load(&self, name: &str) -> Result<BaselineModel, ModelError> {
        let path = self.model_path(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModelError::NotFound { name: name.to_string() })
            }
            Err(e) => return Err(e.into()),
        };
        let model: BaselineModel = serde_json::from_slice(&bytes)
            .map_err(|e| ModelError::Serialization { message: e.to_string() })?;
        model.validate()?;
        Ok(model)
    }

    /// Persist a model, replacing any previous file atomically.
    pub fn save(&self, name: &str, model: &BaselineModel) -> Result<(), ModelError> {
        model.validate()?;

        let lock_path = self.dir.join(format!("{}.lock", sanitize_name(name)));
        let lock_file = File::create(&lock_path)?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock.try_write().map_err(|_| ModelError::Locked {
            message: "another training run is replacing this model".to_string(),
        })?;

        let bytes = serde_json::to_vec_pretty(model)
            .map_err(|e| ModelError::Serialization { message: e.to_string() })?;
        let path = self.model_path(name);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &path)?;
        tracing::info!(model = name, path = %path.display(), "baseline model persisted");
        Ok(())
    }
}

/// Restrict model names to a single safe path segment.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.').to_string();
    if trimmed.is_empty() {
        DEFAULT_MODEL_NAME.to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_path_separators() {
        assert_eq!(sanitize_name("../etc/passwd"), "-etc-passwd");
        assert_eq!(sanitize_name("release v2"), "release-v2");
        assert_eq!(sanitize_name(""), DEFAULT_MODEL_NAME);
    }
}
