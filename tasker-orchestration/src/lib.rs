//! HTTP API surface over the Tasker.
//!
//! Four resources, matching the component design: task submission/lookup,
//! worker-pool/task-listing control, and live service/config management.
//! [`api::build_router`] wires them to a single shared [`api::state::AppState`].

pub mod api;
