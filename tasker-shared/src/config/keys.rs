//! Declared configuration keys.
//!
//! Mirrors the `ApiConfig`/`TaskerConfig` enums of the original
//! implementation: every tunable the orchestrator reads is declared once,
//! here, with its namespace, default, public flag and description. Nothing
//! outside this module invents a namespace string.

use serde_json::json;

/// A statically declared configuration entry.
///
/// `namespace` is the dotted string under which the value is stored
/// (`config.<namespace>`) — globally unique by convention, enforced by
/// nothing but code review, exactly as in the source this was distilled
/// from.
#[derive(Debug, Clone, Copy)]
pub struct ConfigKey {
    pub namespace: &'static str,
    pub default: fn() -> serde_json::Value,
    pub public: bool,
    pub description: &'static str,
}

impl ConfigKey {
    pub const fn new(
        namespace: &'static str,
        default: fn() -> serde_json::Value,
        public: bool,
        description: &'static str,
    ) -> Self {
        Self {
            namespace,
            default,
            public,
            description,
        }
    }
}

/// `orchestrator.api.host` — HTTP bind host.
pub const API_HOST: ConfigKey = ConfigKey::new(
    "orchestrator.api.host",
    || json!("0.0.0.0"),
    true,
    "HTTP bind host",
);

/// `orchestrator.api.port` — HTTP bind port.
pub const API_PORT: ConfigKey =
    ConfigKey::new("orchestrator.api.port", || json!(80), true, "HTTP bind port");

/// `orchestrator.api.debug` — debug mode, seeded from `DEBUG_MODE`.
pub const API_DEBUG: ConfigKey = ConfigKey::new(
    "orchestrator.api.debug",
    debug_mode_default,
    true,
    "Debug mode",
);

fn debug_mode_default() -> serde_json::Value {
    let enabled = std::env::var("DEBUG_MODE")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    json!(enabled)
}

/// `orchestrator.tasker.workers` — worker pool size.
pub const TASKER_WORKERS: ConfigKey = ConfigKey::new(
    "orchestrator.tasker.workers",
    || json!(1),
    true,
    "Worker pool size",
);

/// `orchestrator.tasker.task_lifetime` — TTL (seconds) for non-terminal
/// records (`TASK_EX`).
pub const TASKER_TASK_LIFETIME: ConfigKey = ConfigKey::new(
    "orchestrator.tasker.task_lifetime",
    || json!(86_400),
    true,
    "TTL (s) for non-terminal records",
);

/// `orchestrator.tasker.task_expire` — TTL (seconds) for terminal records
/// (`TASK_RESULT_EX`).
pub const TASKER_TASK_EXPIRE: ConfigKey = ConfigKey::new(
    "orchestrator.tasker.task_expire",
    || json!(3_600),
    true,
    "TTL (s) for terminal records",
);

/// `orchestrator.tasker.task_key` — KV prefix for persisted task records.
pub const TASKER_TASK_KEY: ConfigKey = ConfigKey::new(
    "orchestrator.tasker.task_key",
    || json!("tasker.tasks"),
    false,
    "KV prefix",
);

/// `orchestrator.tasker.task_sync_refresh` — sync-poll interval (seconds).
pub const TASKER_TASK_SYNC_REFRESH: ConfigKey = ConfigKey::new(
    "orchestrator.tasker.task_sync_refresh",
    || json!(5),
    true,
    "Sync-poll interval (s)",
);

/// `orchestrator.tasker.task_sync_timeout` — sync-call timeout (seconds).
pub const TASKER_TASK_SYNC_TIMEOUT: ConfigKey = ConfigKey::new(
    "orchestrator.tasker.task_sync_timeout",
    || json!(180),
    true,
    "Sync-call timeout (s)",
);

/// `orchestrator.tasker.validate_tasks` — default validation-on switch.
pub const TASKER_VALIDATE_TASKS: ConfigKey = ConfigKey::new(
    "orchestrator.tasker.validate_tasks",
    || json!(true),
    true,
    "Default validation on",
);

/// The complete set of keys the orchestrator seeds at startup, grouped
/// the way `ApiConfig`/`TaskerConfig` grouped theirs.
pub const API_BUNDLE: &[ConfigKey] = &[API_HOST, API_PORT, API_DEBUG];

pub const TASKER_BUNDLE: &[ConfigKey] = &[
    TASKER_WORKERS,
    TASKER_TASK_LIFETIME,
    TASKER_TASK_EXPIRE,
    TASKER_TASK_KEY,
    TASKER_TASK_SYNC_REFRESH,
    TASKER_TASK_SYNC_TIMEOUT,
    TASKER_VALIDATE_TASKS,
];

/// Builds the stored key for a config value: `config.<namespace>`.
pub fn config_key(namespace: &str) -> String {
    format!("config.{namespace}")
}

/// Builds the stored key for a publicity marker: `public.<namespace>`.
pub fn config_publicity_key(namespace: &str) -> String {
    format!("public.{namespace}")
}

/// Strips either the `config.` or `public.` prefix, returning the bare
/// namespace. Returns the input unchanged if neither prefix matches.
pub fn config_strip(key: &str) -> &str {
    key.strip_prefix("config.")
        .or_else(|| key.strip_prefix("public."))
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefixes_round_trip() {
        let ns = "orchestrator.api.host";
        assert_eq!(config_key(ns), "config.orchestrator.api.host");
        assert_eq!(config_publicity_key(ns), "public.orchestrator.api.host");
        assert_eq!(config_strip(&config_key(ns)), ns);
        assert_eq!(config_strip(&config_publicity_key(ns)), ns);
    }

    #[test]
    fn bundles_cover_the_recognized_keys() {
        assert_eq!(API_BUNDLE.len(), 3);
        assert_eq!(TASKER_BUNDLE.len(), 7);
    }
}
