//! Space Rental Marketplace API Library
//!
//! # Overview
//!
//! 공간 대여 마켓플레이스(요청 → 견적 → 결제 → 환불)의 백엔드 API.
//! 여섯 개의 도메인 스토어(요청/견적/결제/환불/알림/지갑)를 PostgreSQL
//! 테이블과 트랜잭션 기반 API로 제공한다.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │  Types  │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │
//!                           ▼
//!                ┌─────────────────────┐
//!                │ PostgreSQL │ 인증서비스 │
//!                └─────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리 (단일 Result 규약)
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 도메인 서비스 (인증 클라이언트, 수수료, 알림 조립)
//! - `db`: 데이터베이스 연동 (엔티티별 쿼리 모듈)
//! - `types`: 공통 타입 및 상태 머신 정의

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::ApiError;
pub use services::IdentityProvider;

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub identity: Arc<IdentityProvider>,
    pub config: Arc<Config>,
}
