//! HTTP resources and router assembly.

pub mod control_resource;
pub mod envelope;
pub mod service_resource;
pub mod state;
pub mod task_resource;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the full router: task submission/lookup, control, and service
/// resources sharing one [`AppState`].
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/tasks/{task}",
            get(task_resource::get_task)
                .post(task_resource::post_task)
                .put(task_resource::put_task),
        )
        .route(
            "/control",
            get(control_resource::list_control).delete(control_resource::kill_control),
        )
        .route(
            "/service",
            get(service_resource::get_service)
                .patch(service_resource::patch_service)
                .delete(service_resource::delete_service),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
