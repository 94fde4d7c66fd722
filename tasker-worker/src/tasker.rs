//! `Tasker`: registry + worker pool + result lifecycle, tied together.
//!
//! A direct port of `ThreadTasker` from the source this was distilled
//! from: `register_task`/`add_pre`/`add_post` delegate to the
//! [`crate::registry::TaskRegistry`], `run_task` drives the submission
//! protocol from the component design, and construction performs the same
//! crash-recovery sweep over persisted records before the process accepts
//! new work.

use std::sync::Arc;

use serde_json::{Map, Value};
use tasker_shared::config::ConfigLoader;
use tasker_shared::connector::Connector;
use tasker_shared::{error::OrchestratorError, OrchestratorResult};
use uuid::Uuid;

use crate::pool::{PoolStatus, WorkerPool};
use crate::registry::TaskRegistry;
use crate::task_result::{TaskResult, TaskState};
use crate::task_wrapper::{HookCallable, ParamSpec, TaskCallable};

const BORKED_MESSAGE: &str = "BorkedException: Container got killed during task completion";

fn as_u64(value: &Value, default: u64) -> u64 {
    value.as_u64().unwrap_or(default)
}

fn record_key(task_path: &str, task_id: &str) -> String {
    format!("{task_path}.{task_id}")
}

async fn task_path(config: &ConfigLoader) -> OrchestratorResult<String> {
    use tasker_shared::config::keys;
    let value = config.get(keys::TASKER_TASK_KEY.namespace).await?;
    Ok(value.as_str().unwrap_or("tasker.tasks").to_string())
}

async fn ttl_for(config: &ConfigLoader, state: TaskState) -> OrchestratorResult<u64> {
    use tasker_shared::config::keys;
    let namespace = if state.is_terminal() {
        keys::TASKER_TASK_EXPIRE.namespace
    } else {
        keys::TASKER_TASK_LIFETIME.namespace
    };
    Ok(as_u64(&config.get(namespace).await?, 3_600))
}

async fn save(
    connector: &Arc<dyn Connector>,
    config: &ConfigLoader,
    task_path: &str,
    record: &TaskResult,
) -> OrchestratorResult<()> {
    let ex = ttl_for(config, record.state).await?;
    let bytes = serde_json::to_vec(record)?;
    connector
        .set(&record_key(task_path, &record.task_id), &bytes, Some(ex))
        .await
}

async fn load(
    connector: &Arc<dyn Connector>,
    task_path: &str,
    task_id: &str,
) -> OrchestratorResult<Option<TaskResult>> {
    match connector.get(&record_key(task_path, task_id)).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Task registry, worker pool and result-record lifecycle manager.
#[derive(Clone)]
pub struct Tasker {
    connector: Arc<dyn Connector>,
    config: ConfigLoader,
    registry: Arc<TaskRegistry>,
    pool: Arc<WorkerPool>,
}

impl std::fmt::Debug for Tasker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tasker")
            .field("tasks", &self.registry.names().len())
            .finish()
    }
}

impl Tasker {
    /// Builds a Tasker against `connector`/`config`, sizing the worker
    /// pool from `orchestrator.tasker.workers`, then performs startup
    /// crash recovery: any persisted record with neither a result nor an
    /// exception is marked `ERROR` with a "container killed" marker,
    /// since no worker is left alive to finish it.
    pub async fn new(connector: Arc<dyn Connector>, config: ConfigLoader) -> OrchestratorResult<Self> {
        use tasker_shared::config::keys;

        let worker_num = as_u64(&config.get(keys::TASKER_WORKERS.namespace).await?, 1) as usize;

        let tasker = Self {
            connector,
            config,
            registry: Arc::new(TaskRegistry::new()),
            pool: Arc::new(WorkerPool::new(worker_num)),
        };

        tasker.recover_stranded_tasks().await?;
        Ok(tasker)
    }

    async fn task_path(&self) -> OrchestratorResult<String> {
        task_path(&self.config).await
    }

    async fn save(&self, task_path: &str, record: &TaskResult) -> OrchestratorResult<()> {
        save(&self.connector, &self.config, task_path, record).await
    }

    async fn load(&self, task_path: &str, task_id: &str) -> OrchestratorResult<Option<TaskResult>> {
        load(&self.connector, task_path, task_id).await
    }

    async fn recover_stranded_tasks(&self) -> OrchestratorResult<()> {
        let task_path = self.task_path().await?;
        for mut record in self.list_tasks().await? {
            if record.in_progress() {
                record.error(BORKED_MESSAGE.to_string());
                self.save(&task_path, &record).await?;
            }
        }
        Ok(())
    }

    pub fn register_task(&self, name: impl Into<String>, callable: TaskCallable, spec: ParamSpec) {
        self.registry.register(name, callable, spec);
    }

    pub fn add_pre(&self, name: &str, hook: HookCallable) -> OrchestratorResult<()> {
        self.registry.add_pre(name, hook)
    }

    pub fn add_post(&self, name: &str, hook: HookCallable) -> OrchestratorResult<()> {
        self.registry.add_post(name, hook)
    }

    /// Whether tasks validate their arguments by default, from
    /// `orchestrator.tasker.validate_tasks`.
    pub async fn default_validate(&self) -> OrchestratorResult<bool> {
        use tasker_shared::config::keys;
        Ok(self
            .config
            .get(keys::TASKER_VALIDATE_TASKS.namespace)
            .await?
            .as_bool()
            .unwrap_or(true))
    }

    /// Submits a task invocation. See the component design's submission
    /// protocol: resolve, optionally validate, mint an id, persist `NEW`,
    /// then either run inline (`blocking`) or hand off to the worker pool.
    pub async fn run_task(
        &self,
        name: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
        blocking: bool,
        validate: bool,
    ) -> OrchestratorResult<TaskResult> {
        let wrapper = self.registry.get(name)?;

        if validate {
            wrapper.validate(&args, &kwargs)?;
        }

        let task_path = self.task_path().await?;
        let task_id = Uuid::new_v4().to_string();
        let mut record = TaskResult::new(task_id.clone(), name.to_string(), args.clone(), kwargs.clone());
        self.save(&task_path, &record).await?;

        if blocking {
            match wrapper.run(args, kwargs).await {
                Ok(value) => record.closed(value),
                Err(message) => record.error(message),
            }
            self.save(&task_path, &record).await?;
            return Ok(record);
        }

        let connector = self.connector.clone();
        let config = self.config.clone();
        let wrapper = wrapper.clone();
        let submitted_id = task_id.clone();

        self.pool.submit(async move {
            let Ok(Some(mut record)) = load(&connector, &task_path, &submitted_id).await else {
                return;
            };
            record.started();
            if save(&connector, &config, &task_path, &record).await.is_err() {
                return;
            }

            match wrapper.run(args, kwargs).await {
                Ok(value) => record.closed(value),
                Err(message) => record.error(message),
            }
            let _ = save(&connector, &config, &task_path, &record).await;
        });

        Ok(record)
    }

    pub async fn get_task_info(&self, task_id: &str) -> OrchestratorResult<Option<TaskResult>> {
        let task_path = self.task_path().await?;
        self.load(&task_path, task_id).await
    }

    pub async fn list_tasks(&self) -> OrchestratorResult<Vec<TaskResult>> {
        let task_path = self.task_path().await?;
        let mut out = Vec::new();
        for key in self.connector.keys(&format!("{task_path}.*")).await? {
            if let Some(bytes) = self.connector.get(&key).await? {
                out.push(serde_json::from_slice(&bytes)?);
            }
        }
        Ok(out)
    }

    pub fn get_self_status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Unimplemented in the thread-pool variant, matching the design's
    /// explicit `NotImplemented` contract for `kill_task`.
    pub async fn kill_task(&self, _task_id: &str) -> OrchestratorResult<()> {
        Err(OrchestratorError::NotImplemented(
            "kill_task is not supported by the thread-pool tasker".to_string(),
        ))
    }

    pub async fn graceful_shutdown(&self) -> OrchestratorResult<()> {
        self.connector.graceful_shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tasker_shared::config::keys;
    use tasker_shared::connector::MemoryConnector;

    async fn build_tasker() -> Tasker {
        let connector: Arc<dyn Connector> = Arc::new(MemoryConnector::new());
        let config = ConfigLoader::new(connector.clone(), keys::TASKER_BUNDLE);
        config.init_config(keys::TASKER_BUNDLE).await.unwrap();
        Tasker::new(connector, config).await.unwrap()
    }

    fn echo_callable() -> TaskCallable {
        Arc::new(|_args, kwargs| {
            Box::pin(async move { Ok(Value::Object(kwargs)) })
        })
    }

    #[tokio::test]
    async fn run_task_blocking_returns_done_with_result() {
        let tasker = build_tasker().await;
        tasker.register_task("echo", echo_callable(), ParamSpec::default());

        let mut kwargs = Map::new();
        kwargs.insert("message".into(), json!("hi"));
        let record = tasker
            .run_task("echo", vec![], kwargs.clone(), true, false)
            .await
            .unwrap();

        assert_eq!(record.state, TaskState::Done);
        assert_eq!(record.result, Some(Value::Object(kwargs)));
    }

    #[tokio::test]
    async fn run_task_unknown_name_is_not_found() {
        let tasker = build_tasker().await;
        let err = tasker
            .run_task("missing", vec![], Map::new(), true, false)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn run_task_blocking_validation_failure_does_not_persist_done() {
        let tasker = build_tasker().await;
        let spec = ParamSpec::new(vec![crate::task_wrapper::TaskParam::new("message")]);
        tasker.register_task("echo", echo_callable(), spec);

        let err = tasker
            .run_task("echo", vec![], Map::new(), true, true)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidTaskArguments(_)));
    }

    #[tokio::test]
    async fn run_task_non_blocking_eventually_reaches_done() {
        let tasker = build_tasker().await;
        tasker.register_task("echo", echo_callable(), ParamSpec::default());

        let record = tasker
            .run_task("echo", vec![], Map::new(), false, false)
            .await
            .unwrap();
        assert_eq!(record.state, TaskState::New);

        let mut attempts = 0;
        loop {
            let loaded = tasker.get_task_info(&record.task_id).await.unwrap().unwrap();
            if loaded.state == TaskState::Done || attempts > 20 {
                assert_eq!(loaded.state, TaskState::Done);
                break;
            }
            attempts += 1;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn get_task_info_returns_none_for_unknown_id() {
        let tasker = build_tasker().await;
        assert!(tasker.get_task_info("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn kill_task_is_not_implemented() {
        let tasker = build_tasker().await;
        let err = tasker.kill_task("anything").await.unwrap_err();
        assert!(matches!(err, OrchestratorError::NotImplemented(_)));
    }

    #[tokio::test]
    async fn construction_marks_stranded_records_as_error() {
        let connector: Arc<dyn Connector> = Arc::new(MemoryConnector::new());
        let config = ConfigLoader::new(connector.clone(), keys::TASKER_BUNDLE);
        config.init_config(keys::TASKER_BUNDLE).await.unwrap();

        let stranded = TaskResult::new("stuck-1".into(), "echo".into(), vec![], Map::new());
        let bytes = serde_json::to_vec(&stranded).unwrap();
        connector
            .set("tasker.tasks.stuck-1", &bytes, None)
            .await
            .unwrap();

        let tasker = Tasker::new(connector, config).await.unwrap();
        let recovered = tasker.get_task_info("stuck-1").await.unwrap().unwrap();
        assert_eq!(recovered.state, TaskState::Error);
        assert_eq!(recovered.exception.as_deref(), Some(BORKED_MESSAGE));
    }
}
