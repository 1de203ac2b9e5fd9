//! Services Module
//!
//! 라우트 핸들러가 사용하는 도메인 서비스 레이어
//!
//! # Services
//! - `IdentityProvider`: 외부 인증 서비스 클라이언트 + AuthUser extractor
//! - `fees`: 플랫폼 수수료 계산
//! - `notifier`: 도메인 이벤트별 알림 내용 조립

pub mod fees;
pub mod identity;
pub mod notifier;

pub use identity::{AuthUser, IdentityProvider};
