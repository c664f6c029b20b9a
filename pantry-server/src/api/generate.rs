use super::{ApiError, AppState};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pantry_core::recipe::MSG_INVALID_JSON;
use pantry_core::{RecipeEnvelope, RecipeRequest};
use pantry_error::Error;
use serde_json::Value;
use tracing::{debug, info};

/// `POST /generate-recipes`
///
/// Returns `200` with the envelope whenever the request itself is valid,
/// including when generation failed and the envelope carries an `error`.
pub async fn handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RecipeEnvelope>, ApiError> {
    info!("Received recipe generation request");

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        Error::invalid_request(MSG_INVALID_JSON)
            .with_operation("api::generate")
            .with_context("parse_error", e.to_string())
            .set_source(e)
    })?;
    debug!(request = %value, "request data");

    let request = RecipeRequest::from_json(&value)?;
    let envelope = state.pipeline.generate_envelope(&request).await;

    info!(
        recipes = envelope.recipes.len(),
        failed = envelope.is_error(),
        names = ?envelope.recipe_names(),
        "Generated recipes"
    );

    Ok(Json(envelope))
}

/// `OPTIONS /generate-recipes`
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
