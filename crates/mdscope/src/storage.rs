//! Best-effort key-value persistence.
//!
//! Everything stored here (recent documents, theme preference) is advisory:
//! a missing, unreadable or unwritable backing file must never surface to
//! the caller. Failures are logged and swallowed; reads degrade to absent.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// One JSON object per application, `{ key: value }`, under the state dir.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> serde_json::Map<String, serde_json::Value> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), %err, "state file unreadable");
                }
                return serde_json::Map::new();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %self.path.display(), "state file malformed, starting empty");
                serde_json::Map::new()
            }
        }
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key)?.as_str().map(str::to_string)
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.load();
        map.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        let text = match serde_json::to_string_pretty(&map) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "state serialization failed");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), %err, "cannot create state dir");
                return;
            }
        }
        if let Err(err) = fs::write(&self.path, text) {
            tracing::warn!(path = %self.path.display(), %err, "state write failed");
        }
    }
}

/// In-memory storage for tests and restricted environments.
#[derive(Default)]
pub struct MemoryStorage {
    map: RefCell<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
    }
}
