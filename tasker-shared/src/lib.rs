//! Shared building blocks for the orchestrator core.
//!
//! This crate holds the pieces that both the tasker (`tasker-worker`) and the
//! HTTP surface (`tasker-orchestration`) depend on: the [`Connector`] key/value
//! abstraction, the namespaced dynamic [`config`] layer built on top of it, the
//! [`conductor`] environment/implementation registry, and the shared
//! [`error`] and [`logging`] glue.

pub mod conductor;
pub mod config;
pub mod connector;
pub mod error;
pub mod logging;

pub use conductor::Conductor;
pub use config::ConfigLoader;
pub use connector::Connector;
pub use error::OrchestratorError;

/// Convenience alias used throughout the orchestrator core.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
