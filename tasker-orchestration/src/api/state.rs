//! Shared state handed to every resource.
//!
//! One `Tasker` and one `ConfigLoader` backing all four resources, plus a
//! shutdown notifier the `/service` `DELETE` handler fires — the HTTP
//! analogue of the original's werkzeug shutdown call.

use std::sync::Arc;

use tasker_shared::config::ConfigLoader;
use tasker_worker::Tasker;
use tokio::sync::Notify;

#[derive(Clone)]
pub struct AppState {
    pub tasker: Arc<Tasker>,
    pub config: ConfigLoader,
    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(tasker: Arc<Tasker>, config: ConfigLoader) -> Self {
        Self {
            tasker,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }
}
