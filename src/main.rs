//! Space Rental Marketplace API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client (Frontend)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health  /api/requests/*  /api/quotes/*                ││
//! │  │  /api/payments/*  /api/refunds/*                        ││
//! │  │  /api/notifications/*  /api/wallet/*                    ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  IdentityProvider    fees    notifier                   ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Data Layer                            ││
//! │  │  PostgreSQL (requests/quotes/payments/refunds/          ││
//! │  │              notifications/wallets)                     ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use space_rental_api::{routes, AppState, Config, Database, IdentityProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "space_rental_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting Space Rental API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("📋 Configuration loaded");

    // 데이터베이스 연결
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("🗄️  Database connected");

    // 마이그레이션 실행
    db.run_migrations().await?;
    tracing::info!("📦 Migrations completed");

    // 인증 서비스 클라이언트
    let identity = IdentityProvider::new(&config.identity_url, config.identity_api_key.clone());
    tracing::info!("🔑 Identity provider configured");

    // 앱 상태 구성
    let state = AppState {
        db: Arc::new(db),
        identity: Arc::new(identity),
        config: Arc::new(config.clone()),
    };

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET    /health                        - 서버 상태 확인
///
/// POST   /api/requests                  - 요청 생성 (게스트)
/// GET    /api/requests                  - 요청 목록
/// GET    /api/requests/:id              - 요청 조회
/// PATCH  /api/requests/:id              - 요청 수정 (merge)
/// DELETE /api/requests/:id              - 요청 삭제
/// GET    /api/requests/:id/quotes       - 요청별 견적서 목록
///
/// POST   /api/quotes                    - 견적서 발송 (호스트)
/// GET    /api/quotes                    - 견적서 목록
/// GET    /api/quotes/:id                - 견적서 조회
/// POST   /api/quotes/:id/read           - 열람 처리 (미열람→열람)
///
/// POST   /api/payments                  - 결제 생성 (게스트)
/// GET    /api/payments                  - 결제 목록
/// GET    /api/payments/:id              - 결제 조회
/// POST   /api/payments/:id/complete     - 결제 완료
/// POST   /api/payments/:id/cancel       - 결제 취소
///
/// POST   /api/refunds                   - 환불 요청 (게스트)
/// GET    /api/refunds                   - 환불 목록
/// GET    /api/refunds/:id               - 환불 조회
/// POST   /api/refunds/:id/approve       - 환불 접수 (호스트)
/// POST   /api/refunds/:id/complete      - 환불 완료 (호스트)
/// POST   /api/refunds/:id/reject        - 환불 거절 (호스트)
///
/// GET    /api/notifications             - 알림 목록 (최신순)
/// GET    /api/notifications/unread-count - 미읽음 개수
/// POST   /api/notifications/:id/read    - 읽음 처리
/// POST   /api/notifications/read-all    - 전체 읽음 처리
/// DELETE /api/notifications/:id         - 알림 삭제
///
/// GET    /api/wallet                    - 지갑 잔액 (호스트)
/// POST   /api/wallet/charge             - 캐시 충전
/// POST   /api/wallet/deduct             - 캐시 차감
/// GET    /api/wallet/history            - 원장 조회
/// GET    /api/wallet/auto-charge        - 자동 충전 설정 조회
/// PUT    /api/wallet/auto-charge        - 자동 충전 설정 변경
/// ```
fn create_router(state: AppState) -> Router {
    // CORS 설정
    // 프로덕션에서는 특정 도메인만 허용, 개발 환경에서는 localhost 허용
    let cors = if state.config.is_production() {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
    } else {
        CorsLayer::new()
            .allow_origin([
                "http://localhost:5173".parse().unwrap(), // Vite dev server
                "http://localhost:3000".parse().unwrap(), // Alternative
                "http://127.0.0.1:5173".parse().unwrap(),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))
        // Requests
        .route(
            "/api/requests",
            post(routes::requests::create_request).get(routes::requests::list_requests),
        )
        .route(
            "/api/requests/:id",
            get(routes::requests::get_request)
                .patch(routes::requests::update_request)
                .delete(routes::requests::delete_request),
        )
        .route(
            "/api/requests/:id/quotes",
            get(routes::quotes::list_quotes_by_request),
        )
        // Quotes
        .route(
            "/api/quotes",
            post(routes::quotes::create_quote).get(routes::quotes::list_quotes),
        )
        .route("/api/quotes/:id", get(routes::quotes::get_quote))
        .route("/api/quotes/:id/read", post(routes::quotes::mark_quote_read))
        // Payments
        .route(
            "/api/payments",
            post(routes::payments::create_payment).get(routes::payments::list_payments),
        )
        .route("/api/payments/:id", get(routes::payments::get_payment))
        .route(
            "/api/payments/:id/complete",
            post(routes::payments::complete_payment),
        )
        .route(
            "/api/payments/:id/cancel",
            post(routes::payments::cancel_payment),
        )
        // Refunds
        .route(
            "/api/refunds",
            post(routes::refunds::create_refund).get(routes::refunds::list_refunds),
        )
        .route("/api/refunds/:id", get(routes::refunds::get_refund))
        .route(
            "/api/refunds/:id/approve",
            post(routes::refunds::approve_refund),
        )
        .route(
            "/api/refunds/:id/complete",
            post(routes::refunds::complete_refund),
        )
        .route(
            "/api/refunds/:id/reject",
            post(routes::refunds::reject_refund),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            get(routes::notifications::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(routes::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(routes::notifications::mark_read),
        )
        .route(
            "/api/notifications/:id",
            delete(routes::notifications::delete_notification),
        )
        // Wallet
        .route("/api/wallet", get(routes::wallet::get_wallet))
        .route("/api/wallet/charge", post(routes::wallet::charge_cash))
        .route("/api/wallet/deduct", post(routes::wallet::deduct_cash))
        .route("/api/wallet/history", get(routes::wallet::list_history))
        .route(
            "/api/wallet/auto-charge",
            get(routes::wallet::get_auto_charge).put(routes::wallet::update_auto_charge),
        )
        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // 상태 주입
        .with_state(state)
}
