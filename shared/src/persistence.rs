//! The one persisted value: the player's energy, plus when it was saved.
//!
//! Storage problems never surface to the caller. A missing or unreadable
//! store loads as empty and a failed write is logged and dropped.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ResourceConfig;

pub trait Storage {
    fn load(&self, key: &str) -> Option<f64>;
    fn save(&mut self, key: &str, value: f64);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, f64>,
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    fn save(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Flat `{"key": number}` JSON file, rewritten on every save.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, f64>,
}

impl JsonFileStorage {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), "ignoring unreadable save file: {err}");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no save file yet");
                BTreeMap::new()
            }
            Err(err) => {
                warn!(path = %path.display(), "cannot read save file: {err}");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn flush(&self) -> Result<(), String> {
        let body = serde_json::to_string_pretty(&self.values).map_err(|e| e.to_string())?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(&self.path, body).map_err(|e| e.to_string())
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().filter(|v| v.is_finite())
    }

    fn save(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
        if let Err(err) = self.flush() {
            warn!(path = %self.path.display(), "save failed: {err}");
        }
    }
}

/// Stored value minus what drained while the game was closed, clamped to `[0, max]`.
/// A clock that went backwards drains nothing.
pub fn restore_value(
    stored: f64,
    drain_per_ms: f64,
    now_ms: f64,
    last_saved_ms: f64,
    max: f64,
) -> f64 {
    let elapsed = (now_ms - last_saved_ms).max(0.0);
    (stored - drain_per_ms * elapsed).clamp(0.0, max)
}

/// Milliseconds since the Unix epoch.
pub fn epoch_ms() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMeter {
    key: String,
    max: f64,
    drain_per_ms: f64,
    value: f64,
}

impl ResourceMeter {
    /// A full meter.
    pub fn new(config: &ResourceConfig) -> Self {
        Self {
            key: config.storage_key.clone(),
            max: config.max,
            drain_per_ms: config.drain_per_ms,
            value: config.max,
        }
    }

    pub fn restore(config: &ResourceConfig, storage: &dyn Storage, now_ms: f64) -> Self {
        let mut meter = Self::new(config);
        let stored = storage.load(&meter.key);
        let saved_at = storage.load(&meter.saved_at_key());
        meter.value = match (stored, saved_at) {
            (Some(v), Some(t)) => restore_value(v, meter.drain_per_ms, now_ms, t, meter.max),
            (Some(v), None) => v.clamp(0.0, meter.max),
            _ => meter.max,
        };
        info!(key = %meter.key, value = meter.value, "resource restored");
        meter
    }

    pub fn save(&self, storage: &mut dyn Storage, now_ms: f64) {
        storage.save(&self.key, self.value);
        storage.save(&self.saved_at_key(), now_ms);
    }

    pub fn drain(&mut self, dt_ms: f64) {
        if dt_ms > 0.0 {
            self.value = (self.value - self.drain_per_ms * dt_ms).clamp(0.0, self.max);
        }
    }

    pub fn refill(&mut self) {
        self.value = self.max;
    }

    pub fn add(&mut self, amount: f64) {
        self.value = (self.value + amount).clamp(0.0, self.max);
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn fraction(&self) -> f64 {
        self.value / self.max
    }

    fn saved_at_key(&self) -> String {
        format!("{}.savedAt", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResourceConfig {
        ResourceConfig {
            max: 100.0,
            drain_per_ms: 50.0 / 7_200_000.0,
            storage_key: "energy".into(),
            eat_amount: 25.0,
        }
    }

    #[test]
    fn half_the_drain_window_halves_the_value() {
        let restored = restore_value(50.0, 50.0 / 7_200_000.0, 3_600_000.0, 0.0, 100.0);
        assert!((restored - 25.0).abs() < 1e-9);
    }

    #[test]
    fn restore_clamps_to_range() {
        assert_eq!(restore_value(10.0, 1.0, 1000.0, 0.0, 100.0), 0.0);
        assert_eq!(restore_value(150.0, 0.0, 0.0, 0.0, 100.0), 100.0);
    }

    #[test]
    fn clock_skew_does_not_add_energy() {
        assert_eq!(restore_value(40.0, 1.0, 0.0, 1000.0, 100.0), 40.0);
    }

    #[test]
    fn meter_round_trips_through_storage_with_decay() {
        let mut storage = MemoryStorage::default();
        let mut meter = ResourceMeter::new(&config());
        meter.add(-50.0);
        meter.save(&mut storage, 1_000.0);

        let restored = ResourceMeter::restore(&config(), &storage, 1_000.0 + 3_600_000.0);
        assert!((restored.value() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_storage_starts_full() {
        let meter = ResourceMeter::restore(&config(), &MemoryStorage::default(), 0.0);
        assert_eq!(meter.value(), 100.0);
        assert_eq!(meter.fraction(), 1.0);
    }

    #[test]
    fn value_without_timestamp_is_taken_as_is() {
        let mut storage = MemoryStorage::default();
        storage.save("energy", 33.0);
        let meter = ResourceMeter::restore(&config(), &storage, 1e12);
        assert_eq!(meter.value(), 33.0);
    }

    #[test]
    fn drain_refill_and_add_stay_in_range() {
        let mut meter = ResourceMeter::new(&config());
        meter.drain(7_200_000.0 * 3.0);
        assert_eq!(meter.value(), 0.0);
        meter.add(25.0);
        assert_eq!(meter.value(), 25.0);
        meter.add(500.0);
        assert_eq!(meter.value(), 100.0);
        meter.drain(-10.0);
        assert_eq!(meter.value(), 100.0);
        meter.drain(7_200_000.0);
        meter.refill();
        assert_eq!(meter.value(), 100.0);
    }

    mod file_storage {
        use super::*;

        #[test]
        fn missing_file_loads_empty() {
            let dir = tempfile::tempdir().unwrap();
            let storage = JsonFileStorage::open(dir.path().join("save.json"));
            assert_eq!(storage.load("energy"), None);
        }

        #[test]
        fn saves_survive_reopening() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("save.json");
            let mut storage = JsonFileStorage::open(&path);
            ResourceMeter::new(&config()).save(&mut storage, 42.0);

            let reopened = JsonFileStorage::open(&path);
            assert_eq!(reopened.load("energy"), Some(100.0));
            assert_eq!(reopened.load("energy.savedAt"), Some(42.0));
        }

        #[test]
        fn corrupt_file_is_ignored() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("save.json");
            std::fs::write(&path, "not json at all").unwrap();
            let storage = JsonFileStorage::open(&path);
            assert_eq!(storage.load("energy"), None);
        }

        #[test]
        fn unwritable_path_is_absorbed() {
            let dir = tempfile::tempdir().unwrap();
            // A directory where the file should be makes every write fail.
            let mut storage = JsonFileStorage::open(dir.path());
            storage.save("energy", 1.0);
            assert_eq!(storage.load("energy"), Some(1.0));
        }
    }
}
