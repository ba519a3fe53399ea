//! HTTP API handlers and routing.

pub mod error;
mod health;
pub mod request_context;
pub mod vagas;

use axum::{
    http::{header, HeaderName, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Create the main API router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    let request_id = HeaderName::from_static(request_context::REQUEST_ID_HEADER);

    Router::new()
        // Health endpoints
        .merge(health::routes())
        // Posting workflow
        .merge(vagas::routes())
        // Middleware (last added runs first)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        // Application state
        .with_state(state)
}
