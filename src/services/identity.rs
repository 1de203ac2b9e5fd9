//! Identity Provider Client
//!
//! # Interview Q&A
//!
//! Q: 인증을 직접 구현하지 않고 외부 서비스에 맡긴 이유는?
//! A: 인증은 이 백엔드의 도메인이 아님
//!    - 가입/로그인/OAuth/비밀번호 재설정은 호스팅형 인증 서비스의 표면
//!    - 이 서버는 요청마다 Bearer 토큰을 검증해 정규화된 사용자
//!      {id, email, name, phone, role}만 받아온다
//!    - 권한(게스트/호스트, 소유권)은 여기서 서버 측으로 강제
//!
//! Q: 토큰 검증 실패와 인증 서비스 장애를 어떻게 구분하는가?
//! A: HTTP 상태로 구분
//!    - 401/403 응답 → Unauthorized (클라이언트 문제)
//!    - 연결 실패/5xx → Identity (게이트웨이 문제, 502로 전파)

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use serde::Deserialize;

use crate::error::ApiError;
use crate::types::UserRole;
use crate::AppState;

/// 인증 서비스가 내려주는 정규화된 사용자
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

impl AuthUser {
    /// 호스트 전용 연산 가드
    pub fn require_host(&self) -> Result<(), ApiError> {
        if self.role != UserRole::Host {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }

    /// 게스트 전용 연산 가드
    pub fn require_guest(&self) -> Result<(), ApiError> {
        if self.role != UserRole::Guest {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }

    /// 소유권 검사: 대상 리소스의 소유자 id와 일치해야 한다
    pub fn require_owner(&self, owner_id: &str) -> Result<(), ApiError> {
        if self.id != owner_id {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }
}

/// 인증 서비스 user 엔드포인트 응답
#[derive(Debug, Deserialize)]
struct IdentityUserResponse {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: IdentityUserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct IdentityUserMetadata {
    #[serde(default)]
    name: String,
    phone: Option<String>,
    role: Option<String>,
}

/// 호스팅형 인증 서비스 클라이언트
pub struct IdentityProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl IdentityProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Bearer 토큰 검증 → 정규화된 사용자 반환
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser, ApiError> {
        let mut request = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .bearer_auth(token);

        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Identity(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Identity(format!("unexpected status {}", status)));
        }

        let user: IdentityUserResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Identity(e.to_string()))?;

        Ok(normalize_user(user))
    }
}

/// 응답을 내부 사용자 형태로 정규화 (role 미지정 시 guest)
fn normalize_user(user: IdentityUserResponse) -> AuthUser {
    let role = user
        .user_metadata
        .role
        .as_deref()
        .and_then(|r| UserRole::parse(r).ok())
        .unwrap_or(UserRole::Guest);

    AuthUser {
        id: user.id,
        email: user.email,
        name: user.user_metadata.name,
        phone: user.user_metadata.phone,
        role,
    }
}

/// Bearer 토큰을 뽑아 인증 서비스로 검증하는 extractor
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        state.identity.verify_token(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_user_with_role() {
        let user: IdentityUserResponse = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "email": "host@example.com",
            "user_metadata": {
                "name": "김호스트",
                "phone": "010-1234-5678",
                "role": "host"
            }
        }))
        .unwrap();

        let auth = normalize_user(user);
        assert_eq!(auth.role, UserRole::Host);
        assert_eq!(auth.name, "김호스트");
        assert_eq!(auth.phone.as_deref(), Some("010-1234-5678"));
    }

    #[test]
    fn test_normalize_user_defaults_to_guest() {
        // role 미지정 또는 알 수 없는 값 → guest
        let user: IdentityUserResponse = serde_json::from_value(serde_json::json!({
            "id": "u-2",
            "email": "guest@example.com"
        }))
        .unwrap();
        assert_eq!(normalize_user(user).role, UserRole::Guest);
    }

    #[test]
    fn test_ownership_guards() {
        let auth = AuthUser {
            id: "u-1".to_string(),
            email: "guest@example.com".to_string(),
            name: "게스트".to_string(),
            phone: None,
            role: UserRole::Guest,
        };
        assert!(auth.require_guest().is_ok());
        assert!(auth.require_host().is_err());
        assert!(auth.require_owner("u-1").is_ok());
        assert!(auth.require_owner("u-2").is_err());
    }
}
