//! Student route handlers, including the per-student traversals.

use axum::extract::State;
use axum::http::StatusCode;
use campusnet_core::{Post, Student};
use campusnet_graph::CommonInterest;
use serde::Deserialize;

use super::field;
use crate::envelope::{ApiError, ApiResponse, Deleted, JsonBody, PathParam};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub name: Option<String>,
    pub student_id: Option<String>,
}

pub async fn create_student(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateStudentRequest>,
) -> Result<(StatusCode, ApiResponse<Student>), ApiError> {
    let student = state
        .graph
        .create_student(field(&req.name), field(&req.student_id))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(student)))
}

pub async fn get_student(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<String>,
) -> Result<ApiResponse<Student>, ApiError> {
    Ok(ApiResponse::ok(state.graph.get_student(&student_id).await?))
}

pub async fn delete_student(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<String>,
) -> Result<Deleted, ApiError> {
    Ok(Deleted::new(state.graph.delete_student(&student_id).await?))
}

pub async fn following(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<String>,
) -> Result<ApiResponse<Vec<Student>>, ApiError> {
    Ok(ApiResponse::ok(state.graph.following(&student_id).await?))
}

pub async fn followers(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<String>,
) -> Result<ApiResponse<Vec<Student>>, ApiError> {
    Ok(ApiResponse::ok(state.graph.followers(&student_id).await?))
}

pub async fn suggested_friends(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<String>,
) -> Result<ApiResponse<Vec<Student>>, ApiError> {
    Ok(ApiResponse::ok(
        state.graph.suggested_friends(&student_id).await?,
    ))
}

pub async fn common_interests(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<String>,
) -> Result<ApiResponse<Vec<CommonInterest>>, ApiError> {
    Ok(ApiResponse::ok(
        state.graph.common_interests(&student_id).await?,
    ))
}

pub async fn posts(
    State(state): State<AppState>,
    PathParam(student_id): PathParam<String>,
) -> Result<ApiResponse<Vec<Post>>, ApiError> {
    Ok(ApiResponse::ok(
        state.graph.get_posts_by_author(&student_id).await?,
    ))
}
