//! In-memory map of registered [`TaskWrapper`]s.
//!
//! A `DashMap` keyed by task name, exactly the teacher's choice for
//! concurrent in-memory registries accessed from both the API's serving
//! thread and worker-pool tasks without a central lock.

use std::sync::Arc;

use dashmap::DashMap;
use tasker_shared::OrchestratorError;

use crate::task_wrapper::{HookCallable, ParamSpec, TaskCallable, TaskWrapper};

/// The process-lifetime set of registered tasks. No deregistration, as in
/// the source this was distilled from.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: DashMap<String, Arc<TaskWrapper>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, callable: TaskCallable, spec: ParamSpec) {
        let name = name.into();
        let wrapper = TaskWrapper::new(name.clone(), callable, spec);
        self.tasks.insert(name, Arc::new(wrapper));
    }

    pub fn get(&self, name: &str) -> Result<Arc<TaskWrapper>, OrchestratorError> {
        self.tasks
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| OrchestratorError::TaskNotFound(name.to_string()))
    }

    /// Replaces the pre-hook for `name`, atomically with respect to other
    /// registry readers (the whole wrapper is swapped, not mutated in
    /// place).
    pub fn add_pre(&self, name: &str, hook: HookCallable) -> Result<(), OrchestratorError> {
        self.replace(name, |wrapper| wrapper.pre = Some(hook))
    }

    /// Replaces the post-hook for `name`.
    pub fn add_post(&self, name: &str, hook: HookCallable) -> Result<(), OrchestratorError> {
        self.replace(name, |wrapper| wrapper.post = Some(hook))
    }

    fn replace(
        &self,
        name: &str,
        mutate: impl FnOnce(&mut TaskWrapper),
    ) -> Result<(), OrchestratorError> {
        let mut entry = self
            .tasks
            .get_mut(name)
            .ok_or_else(|| OrchestratorError::TaskNotFound(name.to_string()))?;
        let mut wrapper = (**entry).clone();
        mutate(&mut wrapper);
        *entry = Arc::new(wrapper);
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.tasks.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn noop_callable() -> TaskCallable {
        Arc::new(|_args, _kwargs| Box::pin(async move { Ok(json!(null)) }))
    }

    #[test]
    fn register_then_get_round_trips() {
        let registry = TaskRegistry::new();
        registry.register("health", noop_callable(), ParamSpec::default());
        assert!(registry.get("health").is_ok());
    }

    #[test]
    fn get_unknown_task_is_not_found() {
        let registry = TaskRegistry::new();
        assert!(matches!(
            registry.get("missing"),
            Err(OrchestratorError::TaskNotFound(_))
        ));
    }

    #[test]
    fn add_pre_on_unknown_task_is_not_found() {
        let registry = TaskRegistry::new();
        let hook: HookCallable = Arc::new(|_, _, _, _| Box::pin(async move { Ok(()) }));
        assert!(matches!(
            registry.add_pre("missing", hook),
            Err(OrchestratorError::TaskNotFound(_))
        ));
    }

    #[test]
    fn add_pre_attaches_hook_without_disturbing_callable() {
        let registry = TaskRegistry::new();
        registry.register("health", noop_callable(), ParamSpec::default());
        let hook: HookCallable = Arc::new(|_, _, _, _| Box::pin(async move { Ok(()) }));
        registry.add_pre("health", hook).unwrap();
        let wrapper = registry.get("health").unwrap();
        assert!(wrapper.pre.is_some());
        assert!(wrapper.post.is_none());
        let _ = Map::<String, serde_json::Value>::new();
    }
}
