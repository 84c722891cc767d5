//! Error types for coaweb-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coaweb_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::NoCompany) => StatusCode::BAD_REQUEST,
            ApiError::Core(CoreError::FetchFailed { .. }) | ApiError::Core(CoreError::InvalidResponse { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Core(CoreError::ConfigError { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            ApiError::NotFound { .. } => serde_json::json!({
                "success": false,
                "message": self.to_string(),
            }),
            ApiError::Core(error) => serde_json::json!({
                "success": false,
                "message": error.user_message(),
                "error": error.to_details(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let error = ApiError::from(CoreError::fetch("timeout"));
        assert_eq!(error.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error.to_string(), "timeout");

        let error = ApiError::from(CoreError::NoCompany);
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "No company selected");

        let error = ApiError::from(CoreError::ConfigError { message: "tls".to_string() });
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_error_body_carries_details() {
        let body = ApiError::from(CoreError::fetch("HTTP 503")).body();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "HTTP 503");
        assert_eq!(body["error"]["code"], "FETCH_FAILED");
        assert_eq!(body["error"]["suggestions"].as_array().map(|s| s.len()), Some(2));

        let body = ApiError::from(CoreError::InvalidResponse { message: "missing field `name`".to_string() }).body();
        assert_eq!(body["error"]["code"], "INVALID_RESPONSE");
        assert_eq!(body["error"]["details"]["decode_message"], "missing field `name`");
    }

    #[test]
    fn test_not_found_body() {
        let body = ApiError::NotFound { resource: "/nope".to_string() }.body();
        assert_eq!(body["message"], "Not found: /nope");
        assert!(body.get("error").is_none());
    }
}
