//! On-disk session storage for the CLI

use sc_login_core::{CoreError, CoreResult, DurableStore};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Durable store keeping every key in one JSON object on disk
#[derive(Debug)]
pub struct FileDurableStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileDurableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> CoreResult<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(CoreError::storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(CoreError::storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write(&self, entries: &Map<String, Value>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)
            .map_err(|e| CoreError::storage(format!("failed to write {}: {e}", self.path.display())))
    }

    fn update(&self, apply: impl FnOnce(&mut Map<String, Value>)) -> CoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read()?;
        apply(&mut entries);
        self.write(&entries)
    }
}

impl DurableStore for FileDurableStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.read() {
            Ok(entries) => entries.get(key).and_then(Value::as_str).map(String::from),
            Err(err) => {
                warn!(error = %err, "Session file unreadable");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), Value::String(value.to_string()));
        })
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
