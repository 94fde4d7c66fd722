//! Task registry, signature validation, worker pool and result lifecycle.
//!
//! This crate is the "Tasker" of the orchestration core: [`tasker::Tasker`]
//! ties together a [`registry::TaskRegistry`] of callable tasks, a
//! [`pool::WorkerPool`] of persistent async workers, and
//! [`task_result::TaskResult`] records persisted through
//! `tasker_shared::Connector`.

pub mod pool;
pub mod registry;
pub mod task_result;
pub mod task_wrapper;
pub mod tasker;

pub use task_result::{TaskResult, TaskState};
pub use task_wrapper::{ParamSpec, ParamType, TaskParam, TaskWrapper};
pub use tasker::Tasker;
