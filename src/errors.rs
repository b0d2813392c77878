//! Error taxonomy shared across the gateway.
//!
//! # Responsibilities
//! - Classify failures into the gateway's error categories
//! - Map each category to its HTTP status code
//! - Render structured JSON error responses
//!
//! # Design Decisions
//! - One flat enum for the whole crate; callers pattern-match on the
//!   category, never on message text
//! - Transport-level forwarding failures are not part of this taxonomy;
//!   the dispatcher returns a plain 502 for those

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Error responses carry an explicit charset.
pub const CONTENT_TYPE_JSON: &str = "application/json;charset=UTF-8";

/// Gateway error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// The referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The resource already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// The caller supplied invalid input.
    #[error("{0}")]
    WrongInput(String),

    /// A call to an upstream server failed in a structured way.
    #[error("{0}")]
    UpstreamServerCallFailed(String),

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this category.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::WrongInput(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamServerCallFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "code": status.as_u16(),
            "error": self.to_string(),
        });

        let mut response = (status, body.to_string()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_JSON),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AlreadyExists("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::WrongInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UpstreamServerCallFailed("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_json_response_shape() {
        let response = AppError::NotFound("service abc not registered".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            CONTENT_TYPE_JSON
        );

        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 404);
        assert_eq!(body["error"], "service abc not registered");
    }
}
