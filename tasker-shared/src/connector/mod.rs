//! Key/value persistence abstraction.
//!
//! `Connector` is the opaque typed store that everything else in this crate
//! (and `tasker-worker`) is built on top of: the dynamic [`crate::config`]
//! layer and the task result lifecycle both go through it rather than
//! talking to Redis directly. One concrete backend ships here
//! ([`redis::RedisConnector`]); a second, in-memory backend is available
//! under `test-utils` for unit tests that shouldn't need a live Redis.

pub mod redis;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;

use crate::OrchestratorResult;

pub use self::redis::RedisConnector;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryConnector;

/// Opaque key/value persistence, shared by every component that needs
/// durable state: dynamic config, task results, publicity markers.
///
/// Values are passed through as raw bytes. Callers that want typed values
/// serialize to/from JSON themselves (see [`crate::config::ConfigValue`] and
/// `tasker_worker::task_result::TaskResult`) — the connector itself has no
/// opinion on the payload shape, matching the "typed" pickle-backed mode of
/// the original Redis client, with JSON standing in as the serialization.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Fetches the raw value stored at `key`, or `None` if absent or empty.
    async fn get(&self, key: &str) -> OrchestratorResult<Option<Vec<u8>>>;

    /// Stores `value` at `key`, overwriting any previous value. `ex` is an
    /// optional TTL in seconds; `None` means no expiry.
    async fn set(&self, key: &str, value: &[u8], ex: Option<u64>) -> OrchestratorResult<()>;

    /// Deletes `key`, returning the number of keys actually removed (0 or
    /// 1 for a single key).
    async fn delete(&self, key: &str) -> OrchestratorResult<u64>;

    /// Lists keys matching a glob `pattern` (`*` wildcard).
    async fn keys(&self, pattern: &str) -> OrchestratorResult<Vec<String>>;

    /// Releases pooled connections. Idempotent — safe to call more than
    /// once, including after the connector is otherwise unused.
    async fn graceful_shutdown(&self) -> OrchestratorResult<()>;
}
