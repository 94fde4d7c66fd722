//! Unified error type for the orchestrator core.
//!
//! The original Python implementation raised a small hierarchy of exception
//! classes (`NotAValidConfig`, `NotAFunction`, `InvalidTaskArguments`,
//! `TaskNotFound`, `ConnectorInitFail`, `NotPermitted`, `BorkedException`)
//! rooted at a common `BaseException`. Rust has no exception hierarchy, so
//! those become variants of one `thiserror`-derived enum instead. Call sites
//! that used to catch the base class now match on `OrchestratorError`
//! directly, or use [`OrchestratorError::is_critical`] where the Python code
//! distinguished `BaseError` (recoverable) from `BaseCritical` (fatal).

use thiserror::Error;

/// Every error the orchestrator core can produce.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A config key was read or written with the wrong type, or a namespace
    /// bundle was declared with an invalid default.
    #[error("not a valid config: {0}")]
    NotAValidConfig(String),

    /// A caller tried to register something that isn't callable as a task.
    #[error("not a function: {0}")]
    NotAFunction(String),

    /// Task arguments failed validation against the task's declared
    /// [`crate`](crate)-level parameter spec.
    #[error("invalid task arguments: {0}")]
    InvalidTaskArguments(String),

    /// No task is registered under the requested name.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// The connector could not be constructed or reach its backing store.
    #[error("connector init failed: {0}")]
    ConnectorInitFail(String),

    /// An operation was attempted against a config key or resource that
    /// forbids it (for example, writing a non-public key through the public
    /// API).
    #[error("not permitted: {0}")]
    NotPermitted(String),

    /// A task record was found in a non-terminal state with no way to
    /// determine what happened to it — the worker process that owned it is
    /// gone. Surfaced as the task's own result rather than propagated.
    #[error("borked: {0}")]
    BorkedException(String),

    /// Wraps a lower-level connector I/O failure (Redis, serialization)
    /// that doesn't map to one of the semantic kinds above.
    #[error("connector error: {0}")]
    Connector(String),

    /// JSON encode/decode failure on a value stored through the connector.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An operation is contractually unsupported by the active
    /// implementation (the thread-pool tasker's `kill_task`, for
    /// instance) rather than simply unhandled.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl OrchestratorError {
    /// Mirrors the Python hierarchy's `BaseCritical` split: critical errors
    /// indicate the process or a dependency is in a state the caller can't
    /// reason its way out of, as opposed to a bad request that a client can
    /// retry differently.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::ConnectorInitFail(_) | Self::BorkedException(_) | Self::Connector(_)
        )
    }

    /// Renders as `"{Kind}: {message}"`, matching the `str(exception)`
    /// rendering the original API error envelope relied on.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAValidConfig(_) => "NotAValidConfig",
            Self::NotAFunction(_) => "NotAFunction",
            Self::InvalidTaskArguments(_) => "InvalidTaskArguments",
            Self::TaskNotFound(_) => "TaskNotFound",
            Self::ConnectorInitFail(_) => "ConnectorInitFail",
            Self::NotPermitted(_) => "NotPermitted",
            Self::BorkedException(_) => "BorkedException",
            Self::Connector(_) => "ConnectorError",
            Self::Serialization(_) => "SerializationError",
            Self::NotImplemented(_) => "NotImplemented",
        }
    }
}

impl From<redis::RedisError> for OrchestratorError {
    fn from(err: redis::RedisError) -> Self {
        Self::Connector(err.to_string())
    }
}
