//! `/tasks/:task` — submission and lookup.
//!
//! `GET` looks the path segment up as a task *id* (a previously minted
//! UUID); `POST`/`PUT` treat it as a task *name* to submit against. Same
//! double duty the original Flask resource gave the URL segment.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde_json::{Map, Value};

use super::envelope::{error_response, ok};
use super::state::AppState;

fn parse_body(bytes: &Bytes) -> Result<Map<String, Value>, Response> {
    if bytes.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(_) => Err(error_response(&tasker_shared::OrchestratorError::InvalidTaskArguments(
            "request body must be a JSON object of keyword arguments".to_string(),
        ))),
        Err(e) => Err(error_response(&tasker_shared::OrchestratorError::InvalidTaskArguments(
            format!("invalid JSON body: {e}"),
        ))),
    }
}

fn wants_validation(headers: &HeaderMap) -> Option<bool> {
    headers
        .get("Validate")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true"))
}

pub async fn get_task(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    match state.tasker.get_task_info(&task_id).await {
        Ok(Some(record)) => match serde_json::to_value(&record) {
            Ok(value) => ok("ok", Some(Value::String(task_id)), Some(value)),
            Err(e) => error_response(&e.into()),
        },
        Ok(None) => error_response(&tasker_shared::OrchestratorError::TaskNotFound(task_id)),
        Err(e) => error_response(&e),
    }
}

async fn submit(
    state: AppState,
    task_name: String,
    headers: HeaderMap,
    body: Bytes,
    blocking: bool,
) -> Response {
    let kwargs = match parse_body(&body) {
        Ok(kwargs) => kwargs,
        Err(response) => return response,
    };

    let validate = match wants_validation(&headers) {
        Some(v) => v,
        None => state.tasker.default_validate().await.unwrap_or(true),
    };

    match state
        .tasker
        .run_task(&task_name, vec![], kwargs, blocking, validate)
        .await
    {
        Ok(record) => match serde_json::to_value(&record) {
            Ok(value) => ok("accepted", Some(Value::String(record.task_id.clone())), Some(value)),
            Err(e) => error_response(&e.into()),
        },
        Err(e) => error_response(&e),
    }
}

pub async fn post_task(
    State(state): State<AppState>,
    Path(task_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    submit(state, task_name, headers, body, false).await
}

pub async fn put_task(
    State(state): State<AppState>,
    Path(task_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    submit(state, task_name, headers, body, true).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_parses_as_empty_kwargs() {
        assert!(parse_body(&Bytes::new()).unwrap().is_empty());
    }

    #[test]
    fn object_body_parses_into_kwargs() {
        let bytes = Bytes::from_static(br#"{"message": "hi"}"#);
        let kwargs = parse_body(&bytes).unwrap();
        assert_eq!(kwargs.get("message"), Some(&Value::String("hi".into())));
    }

    #[test]
    fn array_body_is_rejected() {
        let bytes = Bytes::from_static(b"[1,2,3]");
        assert!(parse_body(&bytes).is_err());
    }

    #[test]
    fn validate_header_true_is_honored() {
        let mut headers = HeaderMap::new();
        headers.insert("Validate", "true".parse().unwrap());
        assert_eq!(wants_validation(&headers), Some(true));
    }

    #[test]
    fn missing_validate_header_falls_back_to_none() {
        assert_eq!(wants_validation(&HeaderMap::new()), None);
    }
}
