//! Relationship creation handlers.
//!
//! Whether a missing endpoint is a 404 or a zero-link success depends on the
//! configured [`RelationPolicy`](campusnet_core::RelationPolicy).

use axum::extract::State;
use axum::http::StatusCode;
use campusnet_graph::LinkOutcome;
use serde::Deserialize;

use super::field;
use crate::envelope::{ApiError, ApiResponse, JsonBody};
use crate::state::AppState;

type Linked = Result<(StatusCode, ApiResponse<LinkOutcome>), ApiError>;

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub student1_id: Option<String>,
    pub student2_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub student_id: Option<String>,
    pub course_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JoinClubRequest {
    pub student_id: Option<String>,
    pub club_name: Option<String>,
}

pub async fn follow(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<FollowRequest>,
) -> Linked {
    let outcome = state
        .graph
        .follow(field(&req.student1_id), field(&req.student2_id))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(outcome)))
}

pub async fn enroll(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<EnrollRequest>,
) -> Linked {
    let outcome = state
        .graph
        .enroll(field(&req.student_id), field(&req.course_code))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(outcome)))
}

pub async fn join_club(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<JoinClubRequest>,
) -> Linked {
    let outcome = state
        .graph
        .join_club(field(&req.student_id), field(&req.club_name))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(outcome)))
}
