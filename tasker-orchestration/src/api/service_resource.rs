//! `/service` — worker status, live config inspection/mutation, shutdown.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

use super::envelope::{error_response, ok};
use super::state::AppState;

pub async fn get_service(State(state): State<AppState>) -> Response {
    match state.config.list_config().await {
        Ok(listed) => {
            let configurable: HashMap<String, Value> = listed
                .into_iter()
                .map(|(ns, entry)| {
                    (
                        ns,
                        json!({"desc": entry.description, "val": entry.value}),
                    )
                })
                .collect();
            let body = json!({
                "tasker_status": state.tasker.get_self_status(),
                "api_status": "alive",
                "configurable": configurable,
            });
            ok("ok", None, Some(body))
        }
        Err(e) => error_response(&e),
    }
}

fn value_kind_matches(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

pub async fn patch_service(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let Value::Object(updates) = body else {
        return error_response(&tasker_shared::OrchestratorError::InvalidTaskArguments(
            "request body must be a JSON object of {namespace: value}".to_string(),
        ));
    };

    let mut results = serde_json::Map::new();
    for (namespace, new_value) in updates {
        let outcome = async {
            if !state.config.check_public(&namespace).await? {
                return Err(tasker_shared::OrchestratorError::NotPermitted(namespace.clone()));
            }
            let current = state.config.get(&namespace).await?;
            if !value_kind_matches(&current, &new_value) {
                return Err(tasker_shared::OrchestratorError::InvalidTaskArguments(format!(
                    "type mismatch for '{namespace}'"
                )));
            }
            state.config.set_public(&namespace, new_value).await
        }
        .await;

        match outcome {
            Ok(()) => {
                results.insert(namespace, json!(true));
            }
            Err(e) => {
                results.insert(namespace, json!({"success": false, "error": e.to_string()}));
            }
        }
    }

    ok("ok", None, Some(Value::Object(results)))
}

pub async fn delete_service(State(state): State<AppState>) -> Response {
    state.shutdown.notify_waiters();
    ok("shutting down", None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kind_matches_same_variant() {
        assert!(value_kind_matches(&json!(1), &json!(2)));
        assert!(!value_kind_matches(&json!(1), &json!("1")));
        assert!(!value_kind_matches(&json!(true), &json!(1)));
    }
}
