//! `/control` — worker-pool task listing and kill requests.

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use super::envelope::{error_response, ok};
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct KillQuery {
    pub task_id: String,
}

pub async fn list_control(State(state): State<AppState>) -> Response {
    match state.tasker.list_tasks().await {
        Ok(records) => {
            let items: Vec<_> = records
                .into_iter()
                .map(|record| {
                    json!({
                        "id": record.task_id,
                        "name": record.task_name,
                        "progress": record.in_progress(),
                        "worked_for": record.worked_for(),
                    })
                })
                .collect();
            ok("ok", None, Some(json!(items)))
        }
        Err(e) => error_response(&e),
    }
}

pub async fn kill_control(State(state): State<AppState>, Query(query): Query<KillQuery>) -> Response {
    match state.tasker.kill_task(&query.task_id).await {
        Ok(()) => ok("killed", Some(json!(query.task_id)), None),
        Err(e) => error_response(&e),
    }
}
