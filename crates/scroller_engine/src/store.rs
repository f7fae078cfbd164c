use engine_logging::engine_warn;
use scroller_core::{
    NameList, Settings, DEFAULT_BASE_SPEED, DEFAULT_IMPORTANT_SPEED, DEFAULT_PANEL_MINIMIZED,
};
use serde_json::{Map, Value};
use thiserror::Error;

pub type StoreMap = Map<String, Value>;

pub const KEY_IMPORTANT_PEOPLE: &str = "important_people";
pub const KEY_HIDDEN_USERS: &str = "hidden_users";
pub const KEY_IMPORTANT_SPEED: &str = "important_speed";
pub const KEY_BASE_SPEED: &str = "base_speed";
pub const KEY_PANEL_MINIMIZED: &str = "panel_minimized";

pub const SETTINGS_KEYS: [&str; 4] = [
    KEY_IMPORTANT_PEOPLE,
    KEY_HIDDEN_USERS,
    KEY_IMPORTANT_SPEED,
    KEY_BASE_SPEED,
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("settings store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings store data is corrupt: {0}")]
    Corrupt(String),
}

/// Key/value store holding user settings. `get` returns only the keys
/// that are present.
pub trait SettingsStore {
    fn get(&self, keys: &[&str]) -> Result<StoreMap, StoreError>;
    fn set(&mut self, values: StoreMap) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    values: StoreMap,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: StoreMap) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &StoreMap {
        &self.values
    }
}

impl SettingsStore for MemoryStore {
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
        Ok(())
    }
}

/// Reads settings, falling back to the default for missing or mistyped keys.
pub fn decode_settings(values: &StoreMap) -> Settings {
    let defaults = Settings::default();
    Settings {
        important_people: name_list(values, KEY_IMPORTANT_PEOPLE),
        hidden_users: name_list(values, KEY_HIDDEN_USERS),
        important_speed: speed(values, KEY_IMPORTANT_SPEED).unwrap_or(defaults.important_speed),
        base_speed: speed(values, KEY_BASE_SPEED).unwrap_or(defaults.base_speed),
    }
}

pub fn encode_settings(settings: &Settings) -> StoreMap {
    let mut map = StoreMap::new();
    map.insert(
        KEY_IMPORTANT_PEOPLE.to_string(),
        Value::from(settings.important_people.to_vec()),
    );
    map.insert(
        KEY_HIDDEN_USERS.to_string(),
        Value::from(settings.hidden_users.to_vec()),
    );
    map.insert(
        KEY_IMPORTANT_SPEED.to_string(),
        Value::from(settings.important_speed),
    );
    map.insert(KEY_BASE_SPEED.to_string(), Value::from(settings.base_speed));
    map
}

pub fn decode_panel_minimized(values: &StoreMap) -> bool {
    match values.get(KEY_PANEL_MINIMIZED) {
        None => DEFAULT_PANEL_MINIMIZED,
        Some(Value::Bool(minimized)) => *minimized,
        Some(other) => {
            engine_warn!("Ignoring stored {}={}", KEY_PANEL_MINIMIZED, other);
            DEFAULT_PANEL_MINIMIZED
        }
    }
}

pub fn encode_panel_state(minimized: bool) -> StoreMap {
    let mut map = StoreMap::new();
    map.insert(KEY_PANEL_MINIMIZED.to_string(), Value::Bool(minimized));
    map
}

fn name_list(values: &StoreMap, key: &str) -> NameList {
    match values.get(key) {
        None => NameList::new(),
        Some(Value::Array(items)) => NameList::from_stored(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string)),
        ),
        Some(other) => {
            engine_warn!("Ignoring stored {}={}", key, other);
            NameList::new()
        }
    }
}

fn speed(values: &StoreMap, key: &str) -> Option<f64> {
    let value = values.get(key)?;
    let parsed = value.as_f64().filter(|s| s.is_finite() && *s >= 0.0);
    if parsed.is_none() {
        engine_warn!("Ignoring stored {}={}", key, value);
    }
    parsed
}
