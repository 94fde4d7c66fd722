//! # Tasker Orchestration Server
//!
//! Wires Connector → ConfigLoader → Tasker → HTTP API and serves it.
//! Registers a small built-in demo task set (`health`, `echo`, `sleep`) so
//! the binary has something runnable out of the box.
//!
//! ```bash
//! cargo run --bin tasker-server -- --bind 0.0.0.0:8080
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::{json, Value};
use tasker_shared::config::{keys, ConfigLoader};
use tasker_shared::connector::{Connector, RedisConnector};
use tasker_shared::{logging, Conductor};
use tasker_worker::task_wrapper::{ParamSpec, ParamType, TaskParam};
use tasker_worker::Tasker;
use tokio::signal;
use tracing::{error, info};

use tasker_orchestration::api::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "tasker-server", version, about = "Orchestrator core HTTP server")]
struct Args {
    /// Overrides the bootstrap-config bind address, e.g. 0.0.0.0:8080.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Overrides the bootstrap-config Redis URL.
    #[arg(long)]
    redis_url: Option<String>,
}

fn register_demo_tasks(tasker: &Tasker) {
    tasker.register_task(
        "health",
        Arc::new(|_args, _kwargs| Box::pin(async move { Ok(json!("OK")) })),
        ParamSpec::default(),
    );

    tasker.register_task(
        "echo",
        Arc::new(|_args, kwargs| Box::pin(async move { Ok(Value::Object(kwargs)) })),
        ParamSpec::new(vec![TaskParam::new("message")
            .with_default()
            .typed(ParamType::String)])
        .with_arbitrary_kwargs(),
    );

    tasker.register_task(
        "sleep",
        Arc::new(|_args, kwargs| {
            Box::pin(async move {
                let seconds = kwargs.get("seconds").and_then(Value::as_u64).unwrap_or(0);
                tokio::time::sleep(Duration::from_secs(seconds)).await;
                Ok(json!("OK"))
            })
        }),
        ParamSpec::new(vec![TaskParam::new("seconds").with_default().typed(ParamType::Number)]),
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing();

    info!("Starting orchestrator core server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut conductor = Conductor::from_env()?;
    if let Some(redis_url) = args.redis_url {
        conductor.bootstrap.redis_url = redis_url;
    }

    let connector: Arc<dyn Connector> = Arc::new(RedisConnector::new(&conductor.bootstrap.redis_url).await?);

    let mut declared = Vec::new();
    declared.extend_from_slice(keys::API_BUNDLE);
    declared.extend_from_slice(keys::TASKER_BUNDLE);
    let config = ConfigLoader::new(connector.clone(), &declared);
    config.init_config(&declared).await?;

    let tasker = Arc::new(Tasker::new(connector, config.clone()).await?);
    register_demo_tasks(&tasker);

    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => {
            let host = config
                .get(keys::API_HOST.namespace)
                .await?
                .as_str()
                .unwrap_or("0.0.0.0")
                .to_string();
            let port = config.get(keys::API_PORT.namespace).await?.as_u64().unwrap_or(80) as u16;
            format!("{host}:{port}").parse()?
        }
    };

    let state = AppState::new(tasker.clone(), config);
    let shutdown = state.shutdown.clone();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {bind_addr}");
    info!("   Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Shutdown signal received, closing connector...");
    if let Err(e) = tasker.graceful_shutdown().await {
        error!("Failed to shut connector down cleanly: {e}");
    }
    info!("Orchestrator core server shutdown complete");

    Ok(())
}

/// Waits for Ctrl+C, SIGTERM (Unix), or a `/service` `DELETE` request,
/// whichever comes first.
async fn shutdown_signal(api_shutdown: Arc<tokio::sync::Notify>) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
        _ = api_shutdown.notified() => info!("Received shutdown request via /service"),
    }
}
