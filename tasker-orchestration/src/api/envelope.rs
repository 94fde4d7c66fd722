//! The JSON response envelope every handler returns.
//!
//! A direct port of `gen_response` from the source this was distilled
//! from: every successful or failed call produces the same shape
//! (`message`, `response`, `error`, `object`, `timestamp`), so clients
//! never have to branch on response structure by endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde_json::{json, Value};
use tasker_shared::OrchestratorError;

/// Builds the standard envelope. `object` is typically a task id;
/// `response` carries the payload for read endpoints.
pub fn gen_response(
    message: impl Into<String>,
    error: bool,
    object: Option<Value>,
    response: Option<Value>,
) -> Value {
    json!({
        "message": message.into(),
        "response": response,
        "error": error,
        "object": object,
        "timestamp": Utc::now().timestamp(),
    })
}

pub fn ok(message: impl Into<String>, object: Option<Value>, response: Option<Value>) -> Response {
    (StatusCode::OK, Json(gen_response(message, false, object, response))).into_response()
}

/// Maps an [`OrchestratorError`] to an HTTP status and error envelope. The
/// logger is always-on upstream of this — handlers never suppress an error,
/// they only translate it.
pub fn error_response(err: &OrchestratorError) -> Response {
    let status = match err {
        OrchestratorError::TaskNotFound(_) => StatusCode::NOT_FOUND,
        OrchestratorError::NotPermitted(_) => StatusCode::FORBIDDEN,
        OrchestratorError::InvalidTaskArguments(_) => StatusCode::BAD_REQUEST,
        OrchestratorError::NotAFunction(_) => StatusCode::BAD_REQUEST,
        OrchestratorError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        OrchestratorError::NotAValidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        OrchestratorError::ConnectorInitFail(_)
        | OrchestratorError::Connector(_)
        | OrchestratorError::Serialization(_)
        | OrchestratorError::BorkedException(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = gen_response(format!("{}: {err}", err.kind()), true, None, None);
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gen_response_sets_error_flag_and_timestamp() {
        let envelope = gen_response("boom", true, None, None);
        assert_eq!(envelope["error"], json!(true));
        assert!(envelope["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn task_not_found_maps_to_404() {
        let err = OrchestratorError::TaskNotFound("echo".into());
        let response = error_response(&err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
