//! Liveness and readiness of the portal.
//!
//! `/readyz` is the only endpoint that touches the posting store.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::state::AppState;

const SERVICE: &str = "portal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Body of `/healthz` and `/readyz`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    /// RFC 3339.
    pub checked_at: String,

    /// Only present on `/readyz`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreHealth>,
}

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    fn new(status: HealthStatus, store: Option<StoreHealth>) -> Self {
        Self {
            status,
            service: SERVICE,
            version: env!("CARGO_PKG_VERSION"),
            checked_at: Utc::now().to_rfc3339(),
            store,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/livez", get(livez))
}

async fn healthz() -> impl IntoResponse {
    Json(HealthReport::new(HealthStatus::Ok, None))
}

/// 503 while the posting store cannot be reached.
async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let store = check_store(state).await;

    if store.available {
        (StatusCode::OK, Json(HealthReport::new(HealthStatus::Ok, Some(store))))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport::new(HealthStatus::Degraded, Some(store))),
        )
    }
}

async fn check_store(state: AppState) -> StoreHealth {
    let outcome = tokio::task::spawn_blocking(move || state.health_check())
        .await
        .map_err(|e| e.to_string())
        .and_then(|result| result.map_err(|e| e.to_string()));

    match outcome {
        Ok(()) => StoreHealth {
            available: true,
            error: None,
        },
        Err(message) => {
            error!(error = %message, "Posting store health check failed");
            StoreHealth {
                available: false,
                error: Some(message),
            }
        }
    }
}

async fn livez() -> impl IntoResponse {
    StatusCode::OK
}
