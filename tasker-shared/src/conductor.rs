//! Process bootstrap configuration and environment/role selection.
//!
//! Two distinct concerns live here, mirroring `orchestrator/__init__.py`'s
//! `Conductor` and its `Environment` enums:
//!
//! - [`BootstrapConfig`] — the handful of settings needed before the dynamic
//!   [`crate::config::ConfigLoader`] can even be reached (which Connector to
//!   build, where it lives). Read once from the environment at startup via
//!   the `config` crate plus `dotenvy` for local `.env` files.
//! - [`Conductor`] — given a bootstrap config, resolves which named
//!   implementation backs each role (storage/config/api/tasker). The
//!   original used a metaclass walk over subclasses matching on a `.name`
//!   class attribute; Rust has no such reflection, so this is an explicit
//!   string → variant lookup instead (anticipated directly by the open
//!   question in the component design).

use serde::{Deserialize, Serialize};

use crate::OrchestratorError;

/// Which concrete implementation backs the storage role. Only one exists
/// today; the enum exists so `orc_storage_env` has somewhere to resolve to
/// and so a second backend can be added without changing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageEnvironment {
    Redis,
}

impl StorageEnvironment {
    pub fn name(self) -> &'static str {
        match self {
            Self::Redis => "redis",
        }
    }

    pub fn parse(name: &str) -> Result<Self, OrchestratorError> {
        match name {
            "redis" => Ok(Self::Redis),
            other => Err(OrchestratorError::NotAValidConfig(format!(
                "unknown storage environment: {other}"
            ))),
        }
    }
}

/// Which concrete implementation backs the config role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigEnvironment {
    Persistent,
}

impl ConfigEnvironment {
    pub fn name(self) -> &'static str {
        match self {
            Self::Persistent => "persistent",
        }
    }

    pub fn parse(name: &str) -> Result<Self, OrchestratorError> {
        match name {
            "persistent" => Ok(Self::Persistent),
            other => Err(OrchestratorError::NotAValidConfig(format!(
                "unknown config environment: {other}"
            ))),
        }
    }
}

/// Which concrete implementation backs the API role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiEnvironment {
    Http,
}

impl ApiEnvironment {
    pub fn name(self) -> &'static str {
        match self {
            Self::Http => "http",
        }
    }

    pub fn parse(name: &str) -> Result<Self, OrchestratorError> {
        match name {
            "http" => Ok(Self::Http),
            other => Err(OrchestratorError::NotAValidConfig(format!(
                "unknown api environment: {other}"
            ))),
        }
    }
}

/// Which concrete implementation backs the tasker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEnvironment {
    ThreadPool,
}

impl TaskEnvironment {
    pub fn name(self) -> &'static str {
        match self {
            Self::ThreadPool => "thread_pool",
        }
    }

    pub fn parse(name: &str) -> Result<Self, OrchestratorError> {
        match name {
            "thread_pool" => Ok(Self::ThreadPool),
            other => Err(OrchestratorError::NotAValidConfig(format!(
                "unknown task environment: {other}"
            ))),
        }
    }
}

/// Settings needed before the dynamic config layer is reachable: which
/// Connector to build and its connection parameters, plus the initial
/// worker count and HTTP bind address used until the dynamic config has
/// been read for the first time.
///
/// Strictly a bootstrapping concern — once the process is running, all
/// further tuning goes through [`crate::config::ConfigLoader`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub redis_url: String,
    pub bind_host: String,
    pub bind_port: u16,
    pub initial_workers: usize,
    pub storage_env: StorageEnvironment,
    pub config_env: ConfigEnvironment,
    pub api_env: ApiEnvironment,
    pub task_env: TaskEnvironment,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            bind_host: "0.0.0.0".to_string(),
            bind_port: 80,
            initial_workers: 1,
            storage_env: StorageEnvironment::Redis,
            config_env: ConfigEnvironment::Persistent,
            api_env: ApiEnvironment::Http,
            task_env: TaskEnvironment::ThreadPool,
        }
    }
}

impl BootstrapConfig {
    /// Loads `.env` (if present) then layers `ORC_*`/`orc_*`-style
    /// environment variables over the struct defaults using the `config`
    /// crate, matching the teacher's environment-plus-defaults bootstrap
    /// pattern.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let _ = dotenvy::dotenv();

        let storage_env = match std::env::var("orc_storage_env") {
            Ok(v) => StorageEnvironment::parse(&v)?,
            Err(_) => StorageEnvironment::Redis,
        };
        let config_env = match std::env::var("orc_config_env") {
            Ok(v) => ConfigEnvironment::parse(&v)?,
            Err(_) => ConfigEnvironment::Persistent,
        };
        let api_env = match std::env::var("orc_api_env") {
            Ok(v) => ApiEnvironment::parse(&v)?,
            Err(_) => ApiEnvironment::Http,
        };
        let task_env = match std::env::var("orc_task_env") {
            Ok(v) => TaskEnvironment::parse(&v)?,
            Err(_) => TaskEnvironment::ThreadPool,
        };

        let settings = config::Config::builder()
            .set_default("redis_url", "redis://127.0.0.1:6379")?
            .set_default("bind_host", "0.0.0.0")?
            .set_default("bind_port", 80)?
            .set_default("initial_workers", 1)?
            .add_source(config::Environment::default().try_parsing(true))
            .build()
            .map_err(|e| OrchestratorError::NotAValidConfig(e.to_string()))?;

        Ok(Self {
            redis_url: settings
                .get_string("redis_url")
                .map_err(|e| OrchestratorError::NotAValidConfig(e.to_string()))?,
            bind_host: settings
                .get_string("bind_host")
                .map_err(|e| OrchestratorError::NotAValidConfig(e.to_string()))?,
            bind_port: settings
                .get_int("bind_port")
                .map_err(|e| OrchestratorError::NotAValidConfig(e.to_string()))? as u16,
            initial_workers: settings
                .get_int("initial_workers")
                .map_err(|e| OrchestratorError::NotAValidConfig(e.to_string()))?
                as usize,
            storage_env,
            config_env,
            api_env,
            task_env,
        })
    }
}

impl From<config::ConfigError> for OrchestratorError {
    fn from(err: config::ConfigError) -> Self {
        Self::NotAValidConfig(err.to_string())
    }
}

/// The process-wide role/implementation registry. Thin today — with one
/// implementation per role there's nothing to dispatch on besides
/// validating the selector — but it's the seam a second backend per role
/// would plug into.
#[derive(Debug, Clone)]
pub struct Conductor {
    pub bootstrap: BootstrapConfig,
}

impl Conductor {
    pub fn new(bootstrap: BootstrapConfig) -> Self {
        Self { bootstrap }
    }

    /// Builds a conductor straight from the environment, the entry point
    /// `tasker-server` uses.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        Ok(Self::new(BootstrapConfig::from_env()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bootstrap_selects_builtin_implementations() {
        let cfg = BootstrapConfig::default();
        assert_eq!(cfg.storage_env, StorageEnvironment::Redis);
        assert_eq!(cfg.config_env, ConfigEnvironment::Persistent);
        assert_eq!(cfg.api_env, ApiEnvironment::Http);
        assert_eq!(cfg.task_env, TaskEnvironment::ThreadPool);
    }

    #[test]
    fn environment_names_round_trip_through_parse() {
        assert_eq!(
            StorageEnvironment::parse(StorageEnvironment::Redis.name()).unwrap(),
            StorageEnvironment::Redis
        );
        assert!(StorageEnvironment::parse("made-up").is_err());
    }
}
