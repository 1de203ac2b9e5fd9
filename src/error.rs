//! Error Handling Module
//!
//! Provides type-safe error handling with proper HTTP status code mapping.
//! Uses thiserror for domain errors and integrates with tracing for structured logging.
//!
//! # Design Decision
//!
//! 모든 스토어 연산은 `Result<T, ApiError>` 하나의 규약으로 실패를 전파한다.
//! not-found와 잔액 부족 같은 도메인 실패도 예외 없이 같은 타입을 쓴다:
//! - 클라이언트 에러: 4xx (검증 실패, 권한 없음, 상태 전이 위반 등)
//! - 서버 에러: 5xx (내부 오류)
//!
//! 민감한 내부 정보는 클라이언트에 노출하지 않음

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API 에러 타입
#[derive(Debug, Error)]
pub enum ApiError {
    // ============ 400 Bad Request ============
    #[error("Validation failed: {0}")]
    Validation(String),

    // ============ 401 Unauthorized ============
    #[error("Authentication required")]
    Unauthorized,

    // ============ 403 Forbidden ============
    #[error("Access denied")]
    Forbidden,

    // ============ 404 Not Found ============
    #[error("Resource not found: {0}")]
    NotFound(String),

    // ============ 409 Conflict ============
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("A payment already exists for this quote")]
    DuplicatePayment,

    #[error("Referenced by other records")]
    Referenced(String),

    // ============ 422 Unprocessable Entity ============
    #[error("Insufficient balance: requested {requested}, balance {balance}")]
    InsufficientBalance { balance: i64, requested: i64 },

    // ============ 500 Internal Server Error ============
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,

    // ============ 502 Bad Gateway ============
    #[error("Identity provider error: {0}")]
    Identity(String),
}

/// API 에러 응답 구조
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // 4xx 클라이언트 에러
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(msg.clone()),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                None,
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
                None,
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", resource),
                None,
            ),
            ApiError::InvalidTransition { from, to } => (
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
                format!("cannot transition from {} to {}", from, to),
                None,
            ),
            ApiError::DuplicatePayment => (
                StatusCode::CONFLICT,
                "DUPLICATE_PAYMENT",
                "A payment already exists for this quote".to_string(),
                None,
            ),
            ApiError::Referenced(resource) => (
                StatusCode::CONFLICT,
                "REFERENCED",
                format!("{} is referenced by other records", resource),
                None,
            ),
            ApiError::InsufficientBalance { balance, requested } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_BALANCE",
                "Insufficient balance".to_string(),
                Some(format!("balance: {}, requested: {}", balance, requested)),
            ),

            // 5xx 서버 에러
            ApiError::Database(_) => {
                // 내부 에러는 클라이언트에 상세 정보 노출 안 함
                tracing::error!("Database error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error occurred".to_string(),
                    None,
                )
            }
            ApiError::Internal => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::Identity(msg) => {
                tracing::error!("Identity provider error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "IDENTITY_ERROR",
                    "Identity provider is currently unavailable".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// SQLx 에러를 ApiError로 변환
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("SQLx error: {:?}", err);
        ApiError::Database(err.to_string())
    }
}

/// anyhow 에러를 ApiError로 변환
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Anyhow error: {:?}", err);
        ApiError::Internal
    }
}
