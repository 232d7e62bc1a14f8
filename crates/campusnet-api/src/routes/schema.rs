//! Schema introspection handlers.

use axum::extract::State;
use campusnet_graph::{SchemaSummary, VisualSchema};

use crate::envelope::{ApiError, ApiResponse};
use crate::state::AppState;

pub async fn summary(
    State(state): State<AppState>,
) -> Result<ApiResponse<SchemaSummary>, ApiError> {
    let schema = state.graph.schema_summary().await?;
    Ok(ApiResponse::ok(schema).with_message("Database schema retrieved successfully"))
}

pub async fn visual(State(state): State<AppState>) -> Result<ApiResponse<VisualSchema>, ApiError> {
    let schema = state.graph.visual_schema().await?;
    Ok(ApiResponse::ok(schema).with_message("Visual schema retrieved successfully"))
}
