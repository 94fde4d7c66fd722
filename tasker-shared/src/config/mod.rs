//! Dynamic, namespaced configuration layered on top of a [`Connector`].
//!
//! This is the runtime-mutable tunables layer (`RedisConfigurator` in the
//! source this was distilled from) — distinct from the process-bootstrap
//! [`crate::conductor::BootstrapConfig`], which is read once at startup from
//! the environment and never touches the Connector.

pub mod keys;

use std::collections::HashMap;
use std::sync::Arc;

pub use keys::ConfigKey;

use crate::connector::Connector;
use crate::{OrchestratorError, OrchestratorResult};

/// The current value of a config key, alongside its description, as
/// returned by [`ConfigLoader::list_config`] for the `/service` GET
/// handler.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConfigValue {
    pub description: String,
    pub value: serde_json::Value,
}

/// Namespaced, runtime-mutable configuration backed by a [`Connector`].
///
/// Every `get`/`set` re-checks and lazily seeds the namespace rather than
/// requiring an up-front `init_config` call — the original `RedisConfigurator`
/// did the same (`__check`/`__init_config` run on every access), and callers
/// in this crate rely on that: registering a key and reading it back in the
/// same call is expected to work without a separate bootstrap step.
#[derive(Clone)]
pub struct ConfigLoader {
    connector: Arc<dyn Connector>,
    keys: Arc<HashMap<&'static str, ConfigKey>>,
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl ConfigLoader {
    /// Builds a loader with the given connector and the set of keys it is
    /// allowed to serve; any namespace outside this set is rejected with
    /// [`OrchestratorError::NotAValidConfig`].
    pub fn new(connector: Arc<dyn Connector>, declared: &[ConfigKey]) -> Self {
        let keys = declared.iter().map(|k| (k.namespace, *k)).collect();
        Self {
            connector,
            keys: Arc::new(keys),
        }
    }

    fn resolve(&self, namespace: &str) -> OrchestratorResult<ConfigKey> {
        self.keys
            .get(namespace)
            .copied()
            .ok_or_else(|| OrchestratorError::NotAValidConfig(namespace.to_string()))
    }

    /// Seeds every key in `bundle` that isn't already initialized with its
    /// default value, marking it public if declared so.
    pub async fn init_config(&self, bundle: &[ConfigKey]) -> OrchestratorResult<()> {
        for key in bundle {
            if !self.is_initialized(key.namespace).await? {
                self.write_value(key.namespace, (key.default)()).await?;
                if key.public {
                    self.make_public(key.namespace).await?;
                }
            }
        }
        Ok(())
    }

    /// True if `config.<namespace>` has ever been written.
    pub async fn is_initialized(&self, namespace: &str) -> OrchestratorResult<bool> {
        Ok(self
            .connector
            .get(&keys::config_key(namespace))
            .await?
            .is_some())
    }

    async fn write_value(&self, namespace: &str, value: serde_json::Value) -> OrchestratorResult<()> {
        let bytes = serde_json::to_vec(&value)?;
        self.connector
            .set(&keys::config_key(namespace), &bytes, None)
            .await
    }

    /// Reads `namespace`, lazily seeding it from its default if this is the
    /// first access. `namespace` must name a declared [`ConfigKey`].
    pub async fn get(&self, namespace: &str) -> OrchestratorResult<serde_json::Value> {
        let key = self.resolve(namespace)?;
        match self.connector.get(&keys::config_key(namespace)).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                let default = (key.default)();
                self.write_value(namespace, default.clone()).await?;
                Ok(default)
            }
        }
    }

    /// Writes `value` at `namespace`. `namespace` must name a declared
    /// [`ConfigKey`]; it is not required to already be initialized.
    pub async fn set(&self, namespace: &str, value: serde_json::Value) -> OrchestratorResult<()> {
        self.resolve(namespace)?;
        self.write_value(namespace, value).await
    }

    /// Marks `namespace` runtime-mutable. Idempotent: marking an
    /// already-public namespace public again leaves `list_public`
    /// unchanged.
    pub async fn make_public(&self, namespace: &str) -> OrchestratorResult<()> {
        let key = self.resolve(namespace)?;
        let bytes = key.description.as_bytes();
        self.connector
            .set(&keys::config_publicity_key(namespace), bytes, None)
            .await
    }

    /// Removes the publicity marker for `namespace`, returning `false` if
    /// it wasn't present.
    pub async fn unmake_public(&self, namespace: &str) -> OrchestratorResult<bool> {
        let removed = self
            .connector
            .delete(&keys::config_publicity_key(namespace))
            .await?;
        Ok(removed > 0)
    }

    /// True if `namespace` currently has a publicity marker.
    pub async fn check_public(&self, namespace: &str) -> OrchestratorResult<bool> {
        Ok(self
            .connector
            .get(&keys::config_publicity_key(namespace))
            .await?
            .is_some())
    }

    /// Lists every public namespace and its description.
    pub async fn list_public(&self) -> OrchestratorResult<HashMap<String, String>> {
        let mut out = HashMap::new();
        for raw_key in self.connector.keys("public.*").await? {
            let namespace = keys::config_strip(&raw_key).to_string();
            if let Some(bytes) = self.connector.get(&raw_key).await? {
                let description = String::from_utf8_lossy(&bytes).into_owned();
                out.insert(namespace, description);
            }
        }
        Ok(out)
    }

    /// Reads a value by bare namespace, rejecting with
    /// [`OrchestratorError::NotPermitted`] unless the namespace is public.
    pub async fn get_public(&self, namespace: &str) -> OrchestratorResult<serde_json::Value> {
        if !self.check_public(namespace).await? {
            return Err(OrchestratorError::NotPermitted(namespace.to_string()));
        }
        self.get(namespace).await
    }

    /// Writes a value by bare namespace, rejecting with
    /// [`OrchestratorError::NotPermitted`] unless the namespace is public.
    pub async fn set_public(
        &self,
        namespace: &str,
        value: serde_json::Value,
    ) -> OrchestratorResult<()> {
        if !self.check_public(namespace).await? {
            return Err(OrchestratorError::NotPermitted(namespace.to_string()));
        }
        self.set(namespace, value).await
    }

    /// Resolves every public namespace to its current value and
    /// description, for the `/service` GET handler. A supplement over the
    /// base ConfigLoader contract, added to avoid re-deriving this
    /// `{ns: get_public(ns)}` map inline at every call site.
    pub async fn list_config(&self) -> OrchestratorResult<HashMap<String, ConfigValue>> {
        let mut out = HashMap::new();
        for (namespace, description) in self.list_public().await? {
            let value = self.get(&namespace).await?;
            out.insert(namespace, ConfigValue { description, value });
        }
        Ok(out)
    }

    /// Releases the underlying connector's pooled connections.
    pub async fn graceful_shutdown(&self) -> OrchestratorResult<()> {
        self.connector.graceful_shutdown().await
    }
}
