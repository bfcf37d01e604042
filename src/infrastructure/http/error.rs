//! HTTP Error Handling
//!
//! 业务错误统一返回 HTTP 200，通过 errno 与 kind 区分

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub kind: &'static str,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            errno,
            kind,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 用户可修正的输入错误
    BadRequest(String),
    NotFound(String),
    /// 合成或转码引擎失败，引擎消息原样返回
    Upstream { kind: &'static str, detail: String },
    /// 存储、数据库等内部错误
    Internal { kind: &'static str, detail: String },
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            kind: "internal_error",
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno::BAD_REQUEST, error = %msg, "Bad request");
                ErrorResponse::new(errno::BAD_REQUEST, "validation_error", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = errno::NOT_FOUND, error = %msg, "Resource not found");
                ErrorResponse::new(errno::NOT_FOUND, "not_found", msg)
            }
            ApiError::Upstream { kind, detail } => {
                tracing::error!(errno = errno::BAD_GATEWAY, kind, error = %detail, "Upstream engine failed");
                ErrorResponse::new(errno::BAD_GATEWAY, kind, detail)
            }
            ApiError::Internal { kind, detail } => {
                tracing::error!(errno = errno::INTERNAL_ERROR, kind, error = %detail, "Internal server error");
                ErrorResponse::new(errno::INTERNAL_ERROR, kind, "internal server error")
            }
        };

        (StatusCode::OK, Json(response)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        let kind = e.kind();
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::SynthesisError(detail) | ApplicationError::TranscodeError(detail) => {
                ApiError::Upstream { kind, detail }
            }
            ApplicationError::StorageError(detail)
            | ApplicationError::PersistenceError(detail)
            | ApplicationError::InternalError(detail) => ApiError::Internal { kind, detail },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> serde_json::Value {
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_keeps_message() {
        let err: ApiError = ApplicationError::validation("empty text").into();
        let json = body_json(err).await;

        assert_eq!(json["errno"], 400);
        assert_eq!(json["kind"], "validation_error");
        assert_eq!(json["error"], "empty text");
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let err: ApiError =
            ApplicationError::PersistenceError("disk I/O error at /var/db".to_string()).into();
        let json = body_json(err).await;

        assert_eq!(json["errno"], 500);
        assert_eq!(json["kind"], "persistence_error");
        assert!(!json["error"].as_str().unwrap().contains("/var/db"));
    }

    #[tokio::test]
    async fn test_engine_failure_is_bad_gateway() {
        let err: ApiError = ApplicationError::SynthesisError("HTTP 503".to_string()).into();
        let json = body_json(err).await;

        assert_eq!(json["errno"], 502);
        assert_eq!(json["kind"], "synthesis_error");
        assert_eq!(json["error"], "HTTP 503");
    }

    #[tokio::test]
    async fn test_transcode_failure_keeps_engine_message() {
        let err: ApiError =
            ApplicationError::TranscodeError("Decoding error: no audio track".to_string()).into();
        let json = body_json(err).await;

        assert_eq!(json["errno"], 502);
        assert_eq!(json["kind"], "transcode_error");
        assert_eq!(json["error"], "Decoding error: no audio track");
    }
}
