//! Club route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use campusnet_core::{Club, Student};
use serde::Deserialize;

use super::field;
use crate::envelope::{ApiError, ApiResponse, JsonBody, PathParam};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateClubRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn create_club(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateClubRequest>,
) -> Result<(StatusCode, ApiResponse<Club>), ApiError> {
    let club = state
        .graph
        .create_club(field(&req.name), field(&req.description))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(club)))
}

pub async fn members(
    State(state): State<AppState>,
    PathParam(name): PathParam<String>,
) -> Result<ApiResponse<Vec<Student>>, ApiError> {
    Ok(ApiResponse::ok(state.graph.club_members(&name).await?))
}
