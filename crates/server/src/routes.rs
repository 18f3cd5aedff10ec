pub mod todos;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the application router: `/health` plus the `/todos` resource.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let todos = Router::new().route(
        "/todos",
        get(todos::list_todos)
            .post(todos::create_todo)
            .delete(todos::clear_todos)
            .fallback(todos::unsupported_method),
    );

    Router::new()
        .route("/health", get(health))
        .merge(todos)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
