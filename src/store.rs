use crate::error::ServiceError;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// Collection names. One JSON file per collection under the data directory.
pub mod collections {
    pub const USERS: &str = "users";
    pub const POSTS: &str = "posts";
    pub const MESSAGES: &str = "messages";
    pub const LEAVE_REQUESTS: &str = "leave_requests";
    pub const APPROVALS: &str = "approvals";
    pub const ATTENDANCE: &str = "attendance_logs";
    pub const SCHEDULES: &str = "schedules";
    pub const CHAT_ROOMS: &str = "chat_rooms";
    pub const CHAT_MESSAGES: &str = "chat_messages";
    pub const REFRESH_TOKENS: &str = "refresh_tokens";
    pub const HEARTBEATS: &str = "heartbeats";
    pub const NOTICE_CHECKS: &str = "notice_checks";
    pub const LEAVE_CHECKS: &str = "leave_checks";
    pub const MESSAGE_CHECKS: &str = "message_checks";
    pub const APPROVAL_CHECKS: &str = "approval_checks";
}

/// Epoch milliseconds, the timestamp unit used across all collections.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

struct StoreInner {
    data_dir: PathBuf,
    // Serializes read-modify-write cycles across handler threads. The
    // update model is always "load whole collection, mutate, write back
    // whole collection"; there are no partial updates.
    write_lock: Mutex<()>,
}

/// Flat-file JSON store: one ordered collection per entity type, keyed by
/// string ids unique within each collection.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    pub fn open(data_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        log::info!("store opened at {}", data_dir.display());
        Ok(Store {
            inner: Arc::new(StoreInner {
                data_dir,
                write_lock: Mutex::new(()),
            }),
        })
    }

    /// Take the store-wide write guard for the duration of a
    /// read-modify-write cycle. Plain reads do not need it.
    pub fn guard(&self) -> MutexGuard<'_, ()> {
        self.inner.write_lock.lock().unwrap()
    }

    fn path(&self, collection: &str) -> PathBuf {
        self.inner.data_dir.join(format!("{collection}.json"))
    }

    /// Load a whole collection. A missing file is an empty collection.
    pub fn load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, ServiceError> {
        let path = self.path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    // Readers run without the write guard, so the swap has to be atomic:
    // write a sibling temp file and rename it over the collection. A
    // concurrent load sees either the old contents or the new, never a
    // truncated file.
    fn write_atomic(&self, collection: &str, raw: &str) -> Result<(), ServiceError> {
        let path = self.path(collection);
        let tmp = self.inner.data_dir.join(format!("{collection}.json.tmp"));
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Write a whole collection back. Serialization happens before the file
    /// is touched, so a failed save leaves the previous contents intact.
    pub fn save<T: Serialize>(&self, collection: &str, items: &[T]) -> Result<(), ServiceError> {
        let raw = serde_json::to_string(items)?;
        self.write_atomic(collection, &raw)
    }

    /// Load a keyed map collection (watermarks, heartbeats).
    pub fn load_map(&self, collection: &str) -> Result<HashMap<String, i64>, ServiceError> {
        let path = self.path(collection);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save_map(
        &self,
        collection: &str,
        map: &HashMap<String, i64>,
    ) -> Result<(), ServiceError> {
        let raw = serde_json::to_string(map)?;
        self.write_atomic(collection, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Row {
        id: String,
        n: i64,
    }

    #[test]
    fn missing_collection_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let rows: Vec<Row> = store.load("nothing_here").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn save_then_load_round_trips_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let rows = vec![
            Row { id: "a".into(), n: 1 },
            Row { id: "b".into(), n: 2 },
        ];
        store.save("rows", &rows).unwrap();

        let loaded: Vec<Row> = store.load("rows").unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn save_swaps_atomically_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let old: Vec<Row> = (0..50)
            .map(|n| Row {
                id: format!("old{n}"),
                n,
            })
            .collect();
        store.save("rows", &old).unwrap();

        // Concurrent readers must observe a complete collection, old or
        // new, while a writer keeps replacing it.
        let writer_store = store.clone();
        let writer = std::thread::spawn(move || {
            for round in 0..200 {
                let rows: Vec<Row> = (0..50)
                    .map(|n| Row {
                        id: format!("new{round}"),
                        n,
                    })
                    .collect();
                writer_store.save("rows", &rows).unwrap();
            }
        });

        for _ in 0..200 {
            let rows: Vec<Row> = store.load("rows").unwrap();
            assert_eq!(rows.len(), 50, "reader saw a partial collection");
        }
        writer.join().unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp file left behind");
    }

    #[test]
    fn map_collections_default_empty_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        assert!(store.load_map(collections::HEARTBEATS).unwrap().is_empty());

        let mut map = HashMap::new();
        map.insert("user1".to_string(), 123i64);
        store.save_map(collections::HEARTBEATS, &map).unwrap();

        let loaded = store.load_map(collections::HEARTBEATS).unwrap();
        assert_eq!(loaded.get("user1"), Some(&123));
    }
}
