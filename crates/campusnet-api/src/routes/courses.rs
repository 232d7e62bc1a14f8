//! Course route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use campusnet_core::{Course, Student};
use campusnet_graph::CourseEnrollment;
use serde::Deserialize;

use super::field;
use crate::envelope::{ApiError, ApiResponse, JsonBody, PathParam};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: Option<String>,
    pub code: Option<String>,
}

pub async fn create_course(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateCourseRequest>,
) -> Result<(StatusCode, ApiResponse<Course>), ApiError> {
    let course = state
        .graph
        .create_course(field(&req.name), field(&req.code))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(course)))
}

pub async fn students(
    State(state): State<AppState>,
    PathParam(code): PathParam<String>,
) -> Result<ApiResponse<Vec<Student>>, ApiError> {
    Ok(ApiResponse::ok(state.graph.enrolled_students(&code).await?))
}

pub async fn popular(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<CourseEnrollment>>, ApiError> {
    Ok(ApiResponse::ok(state.graph.popular_courses().await?))
}
