//! Settings store backed by a ron file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use engine_logging::{engine_info, engine_warn};
use scroller_engine::{AtomicFile, PersistError, SettingsStore, StoreError, StoreMap};
use serde_json::Value;

/// Keeps every stored key in memory and rewrites the whole file on `set`.
#[derive(Debug)]
pub struct RonFileStore {
    file: AtomicFile,
    values: BTreeMap<String, Value>,
}

impl RonFileStore {
    /// Opens `path`. A missing or unreadable file starts the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file = AtomicFile::new(path);
        let values = match file.load() {
            Ok(Some(text)) => match ron::from_str::<BTreeMap<String, Value>>(&text) {
                Ok(values) => {
                    engine_info!("Loaded {} stored keys from {:?}", values.len(), file.path());
                    values
                }
                Err(err) => {
                    engine_warn!("Ignoring unparsable store {:?}: {}", file.path(), err);
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                engine_warn!("Failed to read store {:?}: {}", file.path(), err);
                BTreeMap::new()
            }
        };
        Self { file, values }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&self.values, pretty)
            .map_err(|err| StoreError::Corrupt(err.to_string()))?;
        self.file.store(&content).map_err(|err| match err {
            PersistError::Io(io) => StoreError::Io(io),
            other => StoreError::Unavailable(other.to_string()),
        })
    }
}

impl SettingsStore for RonFileStore {
    fn get(&self, keys: &[&str]) -> Result<StoreMap, StoreError> {
        Ok(keys
            .iter()
            .filter_map(|key| {
                self.values
                    .get(*key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect())
    }

    fn set(&mut self, values: StoreMap) -> Result<(), StoreError> {
        self.values.extend(values);
        self.flush()
    }
}
