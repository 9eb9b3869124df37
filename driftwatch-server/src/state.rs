//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use regex::Regex;

use driftwatch_analysis::baseline::ModelStore;
use driftwatch_analysis::detector::DriftDetector;
use driftwatch_core::constants::TEST_DATA_PATTERN;
use driftwatch_core::errors::model_error::ModelError;
use driftwatch_core::types::model::BaselineModel;
use driftwatch_core::DriftwatchConfig;
use driftwatch_storage::AnalysisStore;

/// In-process registry of named baseline models.
///
/// Models are shared read-only across concurrent detections via `Arc`;
/// training replaces the disk file atomically and then swaps the cache
/// entry, so readers see the old model or the new one, never a mix.
pub struct ModelRegistry {
    store: ModelStore,
    cache: RwLock<HashMap<String, Arc<BaselineModel>>>,
}

impl ModelRegistry {
    pub fn open(store: ModelStore) -> Self {
        Self { store, cache: RwLock::new(HashMap::new()) }
    }

    /// Fetch a model, loading and caching from disk on first use.
    pub fn get(&self, name: &str) -> Result<Arc<BaselineModel>, ModelError> {
        if let Ok(cache) = self.cache.read() {
            if let Some(model) = cache.get(name) {
                return Ok(Arc::clone(model));
            }
        }
        let model = Arc::new(self.store.load(name)?);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(name.to_string(), Arc::clone(&model));
        }
        Ok(model)
    }

    /// Persist a model and swap it into the cache.
    pub fn put(&self, name: &str, model: BaselineModel) -> Result<Arc<BaselineModel>, ModelError> {
        self.store.save(name, &model)?;
        let shared = Arc::new(model);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(name.to_string(), Arc::clone(&shared));
        }
        Ok(shared)
    }

    pub fn exists(&self, name: &str) -> bool {
        if let Ok(cache) = self.cache.read() {
            if cache.contains_key(name) {
                return true;
            }
        }
        self.store.exists(name)
    }
}

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DriftwatchConfig>,
    pub store: Arc<AnalysisStore>,
    pub models: Arc<ModelRegistry>,
    pub detector: Arc<DriftDetector>,
    pub test_data: Regex,
    pub started: Instant,
}

impl AppState {
    /// Wire up state from configuration: storage, model registry, and the
    /// configured scorer strategy.
    pub fn from_config(config: DriftwatchConfig) -> anyhow::Result<Self> {
        let store = AnalysisStore::open(&config.effective_db_path())?;
        let models = ModelRegistry::open(ModelStore::open(config.effective_model_dir())?);
        let detector = match &config.scorer_url {
            Some(url) => DriftDetector::remote(
                url.clone(),
                config.effective_scorer_timeout_ms(),
                config.effective_scorer_retries(),
            )?,
            None => DriftDetector::statistical(),
        };
        tracing::info!(scorer = detector.scorer_name(), "detector configured");
        Ok(Self::new(config, store, models, detector))
    }

    pub fn new(
        config: DriftwatchConfig,
        store: AnalysisStore,
        models: ModelRegistry,
        detector: DriftDetector,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            models: Arc::new(models),
            detector: Arc::new(detector),
            test_data: Regex::new(TEST_DATA_PATTERN).expect("valid test-data pattern"),
            started: Instant::now(),
        }
    }

    /// Whether production safety rejects this pipeline name.
    pub fn rejects_as_test_data(&self, pipeline: &str) -> bool {
        self.config.is_production() && self.test_data.is_match(pipeline)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
