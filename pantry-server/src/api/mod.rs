use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pantry_core::RecipePipeline;
use pantry_error::Error;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tracing::error;

pub mod generate;
pub mod health;

pub mod paths {
    pub const GENERATE_RECIPES: &str = "/generate-recipes";
    pub const HEALTH: &str = "/health";
}

/// Shared by all handlers. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RecipePipeline>,
}

impl AppState {
    pub fn new(pipeline: RecipePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error: client errors become `400 {"error": message}`,
/// everything else `500 {"error": "Server error: ..."}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.kind().is_client_error() {
            tracing::info!(error = %err, "rejected request");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.message().to_string(),
                }),
            )
                .into_response()
        } else {
            error!(error = %err, "server error");
            server_error(err.message())
        }
    }
}

fn server_error(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Server error: {}", detail),
        }),
    )
        .into_response()
}

/// Response for a handler panic caught by the catch-panic layer
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(%detail, "handler panicked");
    server_error(&detail)
}
