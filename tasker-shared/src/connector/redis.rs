//! Redis-backed [`Connector`].
//!
//! A thin adapter: every method maps directly onto a single Redis command.
//! No domain logic lives here — the dynamic config layer and the task
//! result lifecycle both treat this as an opaque byte store.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::{OrchestratorError, OrchestratorResult};

use super::Connector;

/// Connects to Redis (or a Redis-compatible store) via a
/// [`ConnectionManager`], which transparently reconnects and is cheap to
/// clone — every call below clones it rather than holding a lock.
#[derive(Debug, Clone)]
pub struct RedisConnector {
    conn: ConnectionManager,
}

impl RedisConnector {
    /// Opens a connection to `url` (`redis://[:password@]host:port[/db]`).
    /// Fails with [`OrchestratorError::ConnectorInitFail`] if the backend
    /// is unreachable, matching the original Python connector's
    /// fail-fast-at-construction behavior.
    pub async fn new(url: &str) -> OrchestratorResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| OrchestratorError::ConnectorInitFail(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| OrchestratorError::ConnectorInitFail(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Connector for RedisConnector {
    async fn get(&self, key: &str) -> OrchestratorResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    async fn set(&self, key: &str, value: &[u8], ex: Option<u64>) -> OrchestratorResult<()> {
        let mut conn = self.conn.clone();
        match ex {
            Some(seconds) => {
                let _: () = conn.set_ex(key, value, seconds).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> OrchestratorResult<u64> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.del(key).await?;
        Ok(count)
    }

    async fn keys(&self, pattern: &str) -> OrchestratorResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    async fn graceful_shutdown(&self) -> OrchestratorResult<()> {
        // ConnectionManager has no explicit close; dropping the last clone
        // tears the socket down. Nothing to flush, so this is a no-op kept
        // for interface parity with the Connector contract.
        Ok(())
    }
}
