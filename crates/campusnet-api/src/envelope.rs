//! Response envelopes and the mapping from failures to HTTP statuses.
//!
//! Success bodies are `{"success": true, "data": ...}`; failures are
//! `{"error": "..."}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use campusnet_graph::GraphError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub success: bool,
    pub deleted_count: i64,
}

impl Deleted {
    pub fn new(deleted_count: i64) -> Self {
        Self {
            success: true,
            deleted_count,
        }
    }
}

impl IntoResponse for Deleted {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Invalid request body: {0}")]
    Body(String),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Endpoint not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Graph(GraphError::Validation(_)) | Self::Body(_) | Self::InvalidPath(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Graph(GraphError::NotFound { .. } | GraphError::EndpointNotFound { .. })
            | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Graph(GraphError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidPath(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejections render as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `Path` extractor whose rejections render as [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use campusnet_core::{RelationKind, ValidationError};
    use campusnet_graph::StoreError;
    use serde_json::json;

    #[test]
    fn maps_graph_errors_to_statuses() {
        let name = ValidationError::MissingField { field: "name" };
        let validation = ApiError::from(GraphError::from(name));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(GraphError::NotFound {
            label: "Student",
            key: "S9".to_string(),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let endpoint = ApiError::from(GraphError::EndpointNotFound {
            relationship: RelationKind::Follows,
            from: "S1".to_string(),
            to: "S9".to_string(),
        });
        assert_eq!(endpoint.status(), StatusCode::NOT_FOUND);

        let refused = StoreError::Connection("refused".to_string());
        let store = ApiError::from(GraphError::from(refused));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn maps_routing_errors_to_statuses() {
        let bad_path = ApiError::InvalidPath("bad".to_string());
        assert_eq!(bad_path.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::RouteNotFound.status(), StatusCode::NOT_FOUND);

        let wrong_method = ApiError::MethodNotAllowed;
        assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(wrong_method.to_string(), "Method not allowed");
    }

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(body, json!({"success": true, "data": [1, 2]}));

        let response = ApiResponse::ok(()).with_message("done");
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["message"], "done");

        let body = serde_json::to_value(Deleted::new(0)).unwrap();
        assert_eq!(body, json!({"success": true, "deleted_count": 0}));
    }
}
