//! Persistent Store: namespaced key-value settings that survive restarts.
//!
//! Values are held as [`toml::Value`] and written back to a TOML file after
//! every change. Reads never fail: a missing, malformed, or wrongly-typed
//! value yields the caller's fallback.

use arcade_core::{first_success, ArcadeError, Result, Strategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where and under which prefix the store keeps its entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix prepended to every key
    pub namespace: String,
    /// Explicit store file; the platform data directory is used when unset
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: "arcade".into(),
            path: None,
        }
    }
}

/// Namespaced scalar store for scores and settings.
pub struct PersistentStore {
    namespace: String,
    data: BTreeMap<String, toml::Value>,
    path: Option<PathBuf>,
}

impl PersistentStore {
    /// A store that lives only in memory.
    pub fn in_memory(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            data: BTreeMap::new(),
            path: None,
        }
    }

    /// Open the file-backed store described by `config`.
    ///
    /// The location is the first of: the configured path, the platform data
    /// directory, the working directory. A corrupt or unreadable file is
    /// logged and treated as empty.
    pub fn open(config: &StoreConfig) -> Self {
        let mut store = Self::in_memory(&config.namespace);
        store.path = resolve_store_path(config.path.as_deref());

        if let Some(path) = store.path.clone() {
            if path.exists() {
                if let Err(e) = store.load_from_file(&path) {
                    log::warn!("store: ignoring unreadable {} ({e})", path.display());
                }
            }
            log::info!("store: using {}", path.display());
        } else {
            log::warn!("store: no writable location, settings will not persist");
        }
        store
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}.{}", self.namespace, key)
    }

    /// Read a number, or `fallback` when absent or not numeric.
    pub fn get_number(&self, key: &str, fallback: f64) -> f64 {
        let parsed = match self.data.get(&self.full_key(key)) {
            Some(toml::Value::Integer(i)) => Some(*i as f64),
            Some(toml::Value::Float(f)) => Some(*f),
            Some(toml::Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite()).unwrap_or(fallback)
    }

    /// Store a number, floored to an integer. Non-finite values are ignored.
    pub fn set_number(&mut self, key: &str, value: f64) {
        if !value.is_finite() {
            log::warn!("store: refusing non-finite value for '{key}'");
            return;
        }
        let key = self.full_key(key);
        self.data
            .insert(key, toml::Value::Integer(value.floor() as i64));
        self.persist();
    }

    /// Read a bool, or `fallback` when absent or not boolean.
    pub fn get_bool(&self, key: &str, fallback: bool) -> bool {
        match self.data.get(&self.full_key(key)) {
            Some(toml::Value::Boolean(b)) => *b,
            Some(toml::Value::String(s)) => match s.trim() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => fallback,
            },
            _ => fallback,
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        let key = self.full_key(key);
        self.data.insert(key, toml::Value::Boolean(value));
        self.persist();
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(&self.full_key(key))
    }

    /// Remove a key, returning whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.data.remove(&self.full_key(key)).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// Write a raw value, bypassing type coercion.
    pub fn set_raw(&mut self, key: &str, value: toml::Value) {
        let key = self.full_key(key);
        self.data.insert(key, value);
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            log::warn!("store: failed to save ({e}), keeping value in memory");
        }
    }

    /// Write the store to its file (no-op for in-memory stores).
    ///
    /// Writes to a sibling temp file and renames it over the target so a
    /// crash mid-write never leaves a truncated store behind.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = toml::to_string_pretty(&self.data)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Load entries from a TOML file, replacing all current data.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let table: BTreeMap<String, toml::Value> = toml::from_str(&content)?;
        self.data = table;
        Ok(())
    }
}

fn writable_file(path: PathBuf) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| ArcadeError::StoreError(format!("{} has no parent", path.display())))?;
    if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(path)
}

fn resolve_store_path(explicit: Option<&Path>) -> Option<PathBuf> {
    first_success([
        Strategy::new("configured path", || match explicit {
            Some(path) => writable_file(path.to_path_buf()),
            None => Err(ArcadeError::StoreError("no path configured".into())),
        }),
        Strategy::new("platform data dir", || {
            let dir = dirs::data_dir()
                .ok_or_else(|| ArcadeError::StoreError("no platform data dir".into()))?;
            writable_file(dir.join("arcade").join("store.toml"))
        }),
        Strategy::new("working directory", || {
            let dir = std::env::current_dir()?;
            writable_file(dir.join("arcade-store.toml"))
        }),
    ])
}
