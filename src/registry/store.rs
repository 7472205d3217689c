use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::{env, fs};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::schema::detector::{DEFAULT_EXAMPLE_MAX_CHARS, DEFAULT_MAX_DEPTH};
use crate::schema::{EndpointSchema, SampleLimits, SchemaDetector, compute_schema_hash, truncate_sample};

use super::describe::{self, SchemaSummary};
use super::error::Result;

const SCHEMAS_FILE: &str = "schemas.json";
const HISTORY_FILE: &str = "schema_history.json";

/// Tunables for retention and truncation. Defaults match the documented
/// policies: last 10 history entries kept on save, samples capped to
/// 20 keys / 3 items / 200 chars, summaries capped to 20 field names.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    pub max_depth: usize,
    pub example_max_chars: usize,
    pub history_keep: usize,
    pub sample_limits: SampleLimits,
    pub summary_max_fields: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            example_max_chars: DEFAULT_EXAMPLE_MAX_CHARS,
            history_keep: 10,
            sample_limits: SampleLimits::default(),
            summary_max_fields: 20,
        }
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    schemas: BTreeMap<String, EndpointSchema>,
    history: BTreeMap<String, Vec<EndpointSchema>>,
}

/// Schema storage, versioning, and change detection.
///
/// Schemas are persisted to disk on every mutation and loaded on startup,
/// so the process can track drift across restarts. All read-modify-write
/// sequences run under a single coarse lock; concurrent updates for the
/// same endpoint cannot lose each other's writes.
pub struct SchemaRegistry {
    cache_dir: PathBuf,
    detector: SchemaDetector,
    options: RegistryOptions,
    inner: Mutex<RegistryState>,
}

impl SchemaRegistry {
    /// Open a registry backed by the given cache directory, loading any
    /// previously persisted schemas.
    ///
    /// If the directory cannot be created (permissions), a process-local
    /// temporary directory is used instead; startup never aborts over an
    /// unwritable configured path.
    pub fn open(cache_dir: impl Into<PathBuf>, options: RegistryOptions) -> Self {
        let requested: PathBuf = cache_dir.into();
        let cache_dir = match fs::create_dir_all(&requested) {
            Ok(()) => requested,
            Err(err) => {
                warn!(
                    path = %requested.display(),
                    error = %err,
                    "cannot create schema cache directory, using temporary directory instead"
                );
                let fallback = env::temp_dir().join(format!("driftwatch-schemas-{}", Uuid::new_v4()));
                if let Err(err) = fs::create_dir_all(&fallback) {
                    error!(
                        path = %fallback.display(),
                        error = %err,
                        "cannot create fallback cache directory, persistence will fail"
                    );
                }
                info!(path = %fallback.display(), "using temporary schema cache directory");
                fallback
            }
        };

        let registry = Self {
            detector: SchemaDetector::new(options.max_depth, options.example_max_chars),
            cache_dir,
            options,
            inner: Mutex::new(RegistryState::default()),
        };
        registry.load();
        registry
    }

    /// Directory the registry actually persists to (may differ from the
    /// configured path after a fallback).
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Update the schema for an endpoint from a fresh response payload.
    ///
    /// Returns the new schema and whether the shape changed since the last
    /// observation. Never fails: malformed payloads produce an empty field
    /// mapping, and persistence errors are logged and swallowed.
    pub fn update_schema(
        &self,
        endpoint: &str,
        response_data: &Value,
        response_code: u16,
        method: &str,
    ) -> (EndpointSchema, bool) {
        let fields = self.detector.analyze_response(response_data);
        let new_hash = compute_schema_hash(&fields);

        let mut state = self.lock();
        let changed = match state.schemas.get(endpoint) {
            Some(existing) => existing.schema_hash != new_hash,
            None => true,
        };

        let new_schema = EndpointSchema {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            fields,
            last_updated: Utc::now(),
            schema_hash: new_hash.clone(),
            response_code,
            is_available: true,
            error_message: None,
            sample_response: Some(truncate_sample(response_data, &self.options.sample_limits)),
        };

        if changed {
            let previous = state.schemas.get(endpoint).cloned();
            let bucket = state.history.entry(endpoint.to_string()).or_default();
            if let Some(previous) = previous {
                bucket.push(previous);
            }
            info!(endpoint, hash = %new_hash, "schema changed");
        }

        state.schemas.insert(endpoint.to_string(), new_schema.clone());
        self.save(&state);

        (new_schema, changed)
    }

    /// Mark an endpoint as unavailable, preserving its last-known fields.
    pub fn mark_unavailable(&self, endpoint: &str, error_message: &str, response_code: u16) {
        let mut state = self.lock();
        match state.schemas.get_mut(endpoint) {
            Some(schema) => {
                schema.is_available = false;
                schema.error_message = Some(error_message.to_string());
                schema.response_code = response_code;
                schema.last_updated = Utc::now();
            }
            None => {
                state.schemas.insert(
                    endpoint.to_string(),
                    EndpointSchema::unavailable(endpoint, error_message, response_code),
                );
            }
        }
        self.save(&state);
    }

    /// Current schema for an endpoint, if one has been observed.
    pub fn get_schema(&self, endpoint: &str) -> Option<EndpointSchema> {
        self.lock().schemas.get(endpoint).cloned()
    }

    /// Snapshot of all registered schemas.
    pub fn get_all_schemas(&self) -> BTreeMap<String, EndpointSchema> {
        self.lock().schemas.clone()
    }

    /// Past schema versions for an endpoint, oldest first.
    pub fn get_history(&self, endpoint: &str) -> Vec<EndpointSchema> {
        self.lock().history.get(endpoint).cloned().unwrap_or_default()
    }

    /// Endpoints whose most recent probe succeeded.
    pub fn get_available_endpoints(&self) -> Vec<String> {
        self.lock()
            .schemas
            .iter()
            .filter(|(_, schema)| schema.is_available)
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }

    /// Compact per-endpoint overview for presentation to the tool layer.
    pub fn get_schema_summary(&self) -> SchemaSummary {
        describe::build_summary(&self.lock().schemas, self.options.summary_max_fields)
    }

    /// Human-readable description of an endpoint's response format.
    pub fn generate_description(&self, endpoint: &str) -> String {
        describe::render_description(endpoint, self.get_schema(endpoint).as_ref())
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schemas_file(&self) -> PathBuf {
        self.cache_dir.join(SCHEMAS_FILE)
    }

    fn history_file(&self) -> PathBuf {
        self.cache_dir.join(HISTORY_FILE)
    }

    fn load(&self) {
        let mut state = self.lock();

        if let Some(schemas) =
            load_json_file::<BTreeMap<String, EndpointSchema>>(&self.schemas_file())
        {
            info!(count = schemas.len(), "loaded cached schemas");
            state.schemas = schemas;
        }

        if let Some(history) =
            load_json_file::<BTreeMap<String, Vec<EndpointSchema>>>(&self.history_file())
        {
            debug!(endpoints = history.len(), "loaded schema history");
            state.history = history;
        }
    }

    fn save(&self, state: &RegistryState) {
        if let Err(err) = self.try_save(state) {
            error!(error = %err, "failed to persist schema cache");
        }
    }

    fn try_save(&self, state: &RegistryState) -> Result<()> {
        write_json_atomic(&self.schemas_file(), &state.schemas)?;

        // History is capped at save time only; the in-memory list may
        // exceed the retention bound between saves.
        let capped: BTreeMap<&String, &[EndpointSchema]> = state
            .history
            .iter()
            .map(|(endpoint, versions)| {
                let skip = versions.len().saturating_sub(self.options.history_keep);
                (endpoint, &versions[skip..])
            })
            .collect();
        write_json_atomic(&self.history_file(), &capped)?;
        Ok(())
    }
}

/// Load and parse a cache file. Corruption is recovered by deleting the
/// offending file and starting fresh for that file only.
fn load_json_file<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read cache file");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "corrupted cache file, removing and starting fresh"
            );
            if let Err(err) = fs::remove_file(path) {
                error!(path = %path.display(), error = %err, "failed to remove corrupted cache file");
            }
            None
        }
    }
}

/// Whole-file overwrite via a temp file and rename, so a crash mid-write
/// cannot leave a half-written document behind.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
