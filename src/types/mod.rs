//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub mod status;

pub use status::{NotificationType, PaymentStatus, QuoteStatus, RefundStatus, RequestStatus};

/// API 응답 래퍼
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// 사용자 역할
///
/// 인증 서비스가 내려주는 정규화된 사용자 형태의 role 필드.
/// 게스트는 요청/결제/환불을, 호스트는 견적/지갑을 소유한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Guest,
    Host,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "guest",
            UserRole::Host => "host",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "guest" => Ok(UserRole::Guest),
            "host" => Ok(UserRole::Host),
            other => Err(ApiError::Validation(format!("unknown role: {}", other))),
        }
    }
}

/// 페이지네이션 메타데이터
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_next: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let has_next = ((page as i64) + 1) * (limit as i64) < total;
        Self {
            page,
            limit,
            total: total.max(0) as u64,
            has_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(UserRole::parse("guest").unwrap(), UserRole::Guest);
        assert_eq!(UserRole::parse("host").unwrap(), UserRole::Host);
        assert!(UserRole::parse("admin").is_err());
    }

    #[test]
    fn test_pagination_has_next() {
        // 45건, 20개씩: 0/1페이지는 다음 있음, 2페이지는 없음
        assert!(Pagination::new(0, 20, 45).has_next);
        assert!(Pagination::new(1, 20, 45).has_next);
        assert!(!Pagination::new(2, 20, 45).has_next);
        assert!(!Pagination::new(0, 20, 0).has_next);
    }
}
