use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use service::todos::{NewTodo, Todo, TodoMap};

use crate::errors::ApiError;
use crate::state::AppState;

/// `POST /todos`: parse the body, create the todo, echo it back with its id.
///
/// The body is decoded by hand so that any malformed payload, including one
/// sent without a JSON content type, is a plain 400 that never reaches the store.
pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let input: NewTodo = serde_json::from_slice(&body).map_err(ApiError::parse)?;
    let todo = state.todos.create(input).await?;
    Ok(Json(todo))
}

/// `GET /todos`: every todo keyed by id.
pub async fn list_todos(State(state): State<AppState>) -> Json<TodoMap> {
    Json(state.todos.list().await)
}

/// `DELETE /todos`: drop everything and wipe the data file.
pub async fn clear_todos(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.todos.clear().await?;
    Ok(StatusCode::OK)
}

pub async fn unsupported_method() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        Router,
    };
    use configs::OnCorrupt;
    use service::todos::TodoStore;
    use tower::ServiceExt;
    use tower_http::cors::CorsLayer;

    use super::*;
    use crate::routes::build_router;

    async fn app(dir: &tempfile::TempDir) -> anyhow::Result<(Router, Arc<TodoStore>)> {
        let store = TodoStore::open(dir.path().join("todos.json"), OnCorrupt::Abort).await?;
        let router = build_router(AppState::new(store.clone()), CorsLayer::very_permissive());
        Ok((router, store))
    }

    async fn send(
        router: &Router,
        method: Method,
        body: &str,
    ) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        let req = Request::builder()
            .method(method)
            .uri("/todos")
            .body(Body::from(body.to_string()))?;
        let res = router.clone().oneshot(req).await?;
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await?;
        Ok((status, bytes.to_vec()))
    }

    #[tokio::test]
    async fn post_then_get_roundtrip() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let (router, _) = app(&tmp).await?;

        let milk = r#"{"title":"buy milk","contents":"2%"}"#;
        let (status, body) = send(&router, Method::POST, milk).await?;
        assert_eq!(status, StatusCode::OK);
        let created: Todo = serde_json::from_slice(&body)?;
        assert!(!created.id.is_empty());
        assert_eq!((created.title.as_str(), created.contents.as_str()), ("buy milk", "2%"));

        let (status, body) = send(&router, Method::GET, "").await?;
        assert_eq!(status, StatusCode::OK);
        let listed: TodoMap = serde_json::from_slice(&body)?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.get(&created.id), Some(&created));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_bodies_are_rejected_without_touching_store() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let (router, store) = app(&tmp).await?;
        send(&router, Method::POST, r#"{"title":"keep","contents":"me"}"#).await?;
        let before = store.list().await;

        let cases = [
            r#"{"title": 5}"#,
            r#"{"title": "x", "contents": null}"#,
            "{not json",
            "",
            r#""text""#,
        ];
        for bad in cases {
            let (status, body) = send(&router, Method::POST, bad).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {bad:?}");
            let err: serde_json::Value = serde_json::from_slice(&body)?;
            assert_eq!(err["error"], "parse_error");
        }

        assert_eq!(store.list().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn delete_clears_everything() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let (router, store) = app(&tmp).await?;
        for _ in 0..3 {
            send(&router, Method::POST, r#"{"title":"t","contents":"c"}"#).await?;
        }

        let (status, _) = send(&router, Method::DELETE, "").await?;
        assert_eq!(status, StatusCode::OK);
        assert!(store.is_empty().await);

        let (_, body) = send(&router, Method::GET, "").await?;
        assert_eq!(body, b"{}");
        Ok(())
    }

    #[tokio::test]
    async fn other_methods_are_not_found() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let (router, _) = app(&tmp).await?;
        for method in [Method::PUT, Method::PATCH] {
            let (status, _) = send(&router, method, "").await?;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_ok() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let (router, _) = app(&tmp).await?;
        let req = Request::builder().uri("/health").body(Body::empty())?;
        let res = router.oneshot(req).await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
        Ok(())
    }
}
