use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is not a well-formed todo.
    #[error("failed to parse JSON data: {0}")]
    Parse(String),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Parse(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::NotFound => "not_found",
            Self::Service(ServiceError::Io { .. }) => "io_error",
            Self::Service(ServiceError::CorruptState { .. }) => "corrupt_state",
            Self::Service(ServiceError::Serialize(_)) => "serialize_error",
            Self::Service(ServiceError::IdExhausted(_)) => "id_exhausted",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(error = %message, kind = self.kind(), "request failed");
        } else {
            warn!(error = %message, kind = self.kind(), "request rejected");
        }
        let body = ErrorBody { error: self.kind().to_string(), message };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot open todo store: {0}")]
    Store(#[from] ServiceError),
}

impl StartupError {
    /// True when startup stopped because the data file could not be decoded.
    pub fn is_corrupt_state(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_corrupt())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::parse("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        let io = ServiceError::io(Path::new("x"), std::io::Error::other("disk full"));
        assert_eq!(ApiError::from(io).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn corrupt_store_is_detected_at_startup() {
        let e = StartupError::from(ServiceError::corrupt(Path::new("todos.json"), "eof"));
        assert!(e.is_corrupt_state());
        assert!(!StartupError::InvalidConfig("x".into()).is_corrupt_state());
    }
}
