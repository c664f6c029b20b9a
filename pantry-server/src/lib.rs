//! # Pantry server
//!
//! HTTP front end for the recipe pipeline.
//!
//! - `POST /generate-recipes`: validate the body, run the pipeline, return the envelope
//! - `OPTIONS /generate-recipes`: preflight, `204`
//! - `GET /health`: static liveness payload, independent of the backend
//!
//! Every response carries permissive cross-origin headers.

pub mod api;
pub mod config;
pub mod cors;

pub use api::{paths, AppState};
pub use config::ServerConfig;

use axum::routing::{get, post};
use axum::Router;
use pantry_core::RecipePipeline;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Build the application router around a pipeline
pub fn router(pipeline: RecipePipeline) -> Router {
    let state = AppState::new(pipeline);

    Router::new()
        .route(
            paths::GENERATE_RECIPES,
            post(api::generate::handler).options(api::generate::preflight),
        )
        .route(paths::HEALTH, get(api::health::handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors::allow_origin_layer())
                .layer(cors::allow_headers_layer())
                .layer(cors::allow_methods_layer())
                .layer(CatchPanicLayer::custom(api::panic_response)),
        )
}
