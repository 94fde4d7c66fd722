//! `TaskResult`: one persisted invocation record.
//!
//! Mirrors `Tasker.TaskResultWrapper` from the source this was distilled
//! from — same fields, same NEW/PROGRESS/DONE/ERROR states, same
//! `started`/`closed`/`error` transition helpers — but as a plain
//! serializable struct rather than a wrapper around a loaded dict, since
//! Rust has no dynamic attribute access to wrap.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state of a [`TaskResult`]. Strictly monotonic: `NEW` <
/// `PROGRESS` < `{DONE, ERROR}`; terminal states never transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    New,
    Progress,
    Done,
    Error,
}

impl TaskState {
    /// `DONE` and `ERROR` are terminal; only terminal records get the
    /// shorter `TASK_RESULT_EX` TTL.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// One task invocation's persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    pub task_name: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
    pub state: TaskState,
    pub created_ts: i64,
    pub updated_ts: i64,
    pub result: Option<Value>,
    /// Present iff the task or a hook raised; doubles as the "exception
    /// flag" the original used to detect crash-stranded records.
    pub exception: Option<String>,
}

impl TaskResult {
    /// Builds a freshly minted record in state `NEW`.
    pub fn new(task_id: String, task_name: String, args: Vec<Value>, kwargs: Map<String, Value>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            task_id,
            task_name,
            args,
            kwargs,
            state: TaskState::New,
            created_ts: now,
            updated_ts: now,
            result: None,
            exception: None,
        }
    }

    /// `NEW` → `PROGRESS`: the worker has picked the record up.
    pub fn started(&mut self) {
        self.state = TaskState::Progress;
        self.touch();
    }

    /// → `DONE` with the callable's return value.
    pub fn closed(&mut self, result: Value) {
        self.state = TaskState::Done;
        self.result = Some(result);
        self.touch();
    }

    /// → `ERROR` with a human-readable cause.
    pub fn error(&mut self, message: String) {
        self.state = TaskState::Error;
        self.exception = Some(message);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_ts = Utc::now().timestamp();
    }

    /// True while the record has neither a result nor an exception —
    /// used by `/control` listing ("progress") and by crash recovery to
    /// spot records stranded by a killed worker process.
    pub fn in_progress(&self) -> bool {
        self.result.is_none() && self.exception.is_none()
    }

    pub fn worked_for(&self) -> i64 {
        self.updated_ts - self.created_ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TaskResult {
        TaskResult::new("id-1".into(), "echo".into(), vec![], Map::new())
    }

    #[test]
    fn new_record_starts_in_new_state_and_in_progress() {
        let record = sample();
        assert_eq!(record.state, TaskState::New);
        assert!(record.in_progress());
        assert!(!record.state.is_terminal());
    }

    #[test]
    fn started_moves_to_progress_without_touching_result() {
        let mut record = sample();
        record.started();
        assert_eq!(record.state, TaskState::Progress);
        assert!(record.in_progress());
    }

    #[test]
    fn closed_sets_done_and_result() {
        let mut record = sample();
        record.closed(json!("OK"));
        assert_eq!(record.state, TaskState::Done);
        assert_eq!(record.result, Some(json!("OK")));
        assert!(!record.in_progress());
        assert!(record.state.is_terminal());
    }

    #[test]
    fn error_sets_error_and_exception() {
        let mut record = sample();
        record.error("boom".into());
        assert_eq!(record.state, TaskState::Error);
        assert_eq!(record.exception.as_deref(), Some("boom"));
        assert!(!record.in_progress());
    }

    #[test]
    fn serializes_state_as_uppercase() {
        let record = sample();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["state"], json!("NEW"));
    }
}
