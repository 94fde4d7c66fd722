//! In-memory [`Connector`] for tests.
//!
//! Grounded the same way the teacher's `pmcp-tasks` store module keeps a
//! real backend alongside a fake one for unit tests that shouldn't need a
//! live service. TTLs are honored by wall-clock comparison on read; there is
//! no background sweeper, so an expired entry lingers until the next `get`
//! or `keys` call touches it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::OrchestratorResult;

use super::Connector;

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// A process-local, non-persistent stand-in for [`super::RedisConnector`].
#[derive(Default)]
pub struct MemoryConnector {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }
}

fn glob_match(pattern: &str, candidate: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == candidate,
        Some((prefix, suffix)) => {
            candidate.len() >= prefix.len() + suffix.len()
                && candidate.starts_with(prefix)
                && candidate.ends_with(suffix)
        }
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn get(&self, key: &str) -> OrchestratorResult<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().expect("memory connector lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) if entry.value.is_empty() => Ok(None),
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ex: Option<u64>) -> OrchestratorResult<()> {
        let mut entries = self.entries.lock().expect("memory connector lock poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: ex.map(|secs| Instant::now() + Duration::from_secs(secs)),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> OrchestratorResult<u64> {
        let mut entries = self.entries.lock().expect("memory connector lock poisoned");
        Ok(entries.remove(key).map_or(0, |_| 1))
    }

    async fn keys(&self, pattern: &str) -> OrchestratorResult<Vec<String>> {
        let mut entries = self.entries.lock().expect("memory connector lock poisoned");
        entries.retain(|_, entry| !entry.is_expired());
        Ok(entries
            .keys()
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect())
    }

    async fn graceful_shutdown(&self) -> OrchestratorResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_value() {
        let conn = MemoryConnector::new();
        conn.set("a.b", b"hello", None).await.unwrap();
        assert_eq!(conn.get("a.b").await.unwrap(), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let conn = MemoryConnector::new();
        assert_eq!(conn.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_reports_removed_count() {
        let conn = MemoryConnector::new();
        conn.set("a", b"1", None).await.unwrap();
        assert_eq!(conn.delete("a").await.unwrap(), 1);
        assert_eq!(conn.delete("a").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn keys_glob_matches_prefix_and_suffix() {
        let conn = MemoryConnector::new();
        conn.set("tasker.tasks.1", b"x", None).await.unwrap();
        conn.set("tasker.tasks.2", b"x", None).await.unwrap();
        conn.set("config.other", b"x", None).await.unwrap();

        let mut found = conn.keys("tasker.tasks.*").await.unwrap();
        found.sort();
        assert_eq!(found, vec!["tasker.tasks.1", "tasker.tasks.2"]);
    }

    #[tokio::test]
    async fn expired_entry_is_not_returned() {
        let conn = MemoryConnector::new();
        conn.set("a", b"1", Some(0)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(conn.get("a").await.unwrap(), None);
    }
}
