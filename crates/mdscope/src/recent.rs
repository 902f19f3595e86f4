//! Bounded most-recently-used document history.
//!
//! Entries are unique by name (re-opening refreshes position instead of
//! duplicating), newest first, capped at [`MAX_RECENT`]. Persistence goes
//! through [`Storage`], so a degraded store silently behaves as empty.

use serde::Deserialize;
use serde::Serialize;
use std::rc::Rc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::storage::Storage;

pub const MAX_RECENT: usize = 10;
const RECENT_KEY: &str = "recent-documents";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub name: String,
    pub raw: String,
    /// Unix epoch milliseconds at record time.
    pub ts: u64,
}

pub struct RecentStore {
    storage: Rc<dyn Storage>,
}

impl RecentStore {
    pub fn new(storage: Rc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Records a document snapshot, moving any same-name entry to the front.
    pub fn record(&self, name: &str, raw: &str) {
        self.record_at(name, raw, now_ms());
    }

    fn record_at(&self, name: &str, raw: &str, ts: u64) {
        let mut list = self.list();
        list.retain(|e| e.name != name);
        list.insert(
            0,
            RecentEntry {
                name: name.to_string(),
                raw: raw.to_string(),
                ts,
            },
        );
        list.truncate(MAX_RECENT);
        match serde_json::to_string(&list) {
            Ok(json) => self.storage.set(RECENT_KEY, &json),
            Err(err) => tracing::warn!(%err, "recent list serialization failed"),
        }
    }

    /// Most-recent-first entries; empty when the store is absent or corrupt.
    pub fn list(&self) -> Vec<RecentEntry> {
        self.storage
            .get(RECENT_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> RecentStore {
        RecentStore::new(Rc::new(MemoryStorage::default()))
    }

    #[test]
    fn recording_prepends_newest_first() {
        let s = store();
        s.record_at("a", "A", 1);
        s.record_at("b", "B", 2);
        let listed = s.list();
        let names: Vec<&str> = listed.iter().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn same_name_refreshes_instead_of_duplicating() {
        let s = store();
        s.record_at("a", "old", 1);
        s.record_at("b", "B", 2);
        s.record_at("a", "new", 3);

        let list = s.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "a");
        assert_eq!(list[0].raw, "new");
        assert_eq!(list[0].ts, 3);
        assert_eq!(list[1].name, "b");
    }

    #[test]
    fn eleven_distinct_names_keep_ten_dropping_the_oldest() {
        let s = store();
        for i in 0..11u64 {
            s.record_at(&format!("doc{i}"), "x", i);
        }
        let list = s.list();
        assert_eq!(list.len(), MAX_RECENT);
        assert_eq!(list[0].name, "doc10");
        assert_eq!(list[9].name, "doc1");
        assert!(!list.iter().any(|e| e.name == "doc0"));
    }

    #[test]
    fn degraded_storage_reads_as_empty_and_records_quietly() {
        struct BrokenStorage;
        impl Storage for BrokenStorage {
            fn get(&self, _key: &str) -> Option<String> {
                None
            }
            fn set(&self, _key: &str, _value: &str) {}
        }

        let s = RecentStore::new(Rc::new(BrokenStorage));
        assert!(s.list().is_empty());
        s.record("a", "A");
        assert!(s.list().is_empty());
    }

    #[test]
    fn corrupt_payload_degrades_to_empty() {
        let storage = Rc::new(MemoryStorage::default());
        storage.set(RECENT_KEY, "{{not a list");
        let s = RecentStore::new(storage);
        assert!(s.list().is_empty());
    }
}
