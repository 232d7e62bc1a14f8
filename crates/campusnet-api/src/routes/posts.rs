//! Post route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use campusnet_core::Post;
use serde::Deserialize;

use super::field;
use crate::envelope::{ApiError, ApiResponse, Deleted, JsonBody, PathParam};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub author_id: Option<String>,
}

pub async fn create_post(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, ApiResponse<Post>), ApiError> {
    let post = state
        .graph
        .create_post(field(&req.content), field(&req.author_id))
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(post)))
}

/// The id stays a string here so a non-numeric id is a validation error
/// rather than a path rejection.
pub async fn delete_post(
    State(state): State<AppState>,
    PathParam(post_id): PathParam<String>,
) -> Result<Deleted, ApiError> {
    Ok(Deleted::new(state.graph.delete_post(&post_id).await?))
}
