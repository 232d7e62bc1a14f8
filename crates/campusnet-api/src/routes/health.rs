//! Index, health, and fallback handlers.

use axum::extract::State;
use serde::Serialize;

use crate::envelope::{ApiError, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn index() -> &'static str {
    "CampusNet social graph API. Endpoints are served under /api."
}

/// Round-trips a trivial statement through the store.
pub async fn health(State(state): State<AppState>) -> Result<ApiResponse<Health>, ApiError> {
    state.graph.ping().await?;
    Ok(ApiResponse::ok(Health { status: "ok" }))
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
