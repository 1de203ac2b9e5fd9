//! Database Module
//!
//! # Interview Q&A
//!
//! Q: 왜 PostgreSQL인가?
//! A: 마켓플레이스 백엔드에 필요한 것들
//!
//!    1. ACID 트랜잭션: 견적 생성 + 요청 상태 변경, 잔액 + 원장 기록을
//!       하나의 트랜잭션으로 묶음
//!    2. 외래키: 결제→견적, 환불→결제 참조 무결성을 DB가 강제
//!    3. 인덱싱: 사용자별/요청별 조회가 전체 스캔이 아님
//!    4. 부분 유니크 인덱스: 견적서당 유효 결제 1건 강제
//!
//! Q: SQLx를 선택한 이유는?
//! A: 타입 안전성, async 지원, 마이그레이션 내장
//!
//! Q: 커넥션 풀은 어떻게 관리하는가?
//! A: SQLx의 PgPool 사용
//!    - 최소/최대 커넥션 수 설정
//!    - 커넥션 재사용 (오버헤드 감소)
//!    - 타임아웃 처리

mod models;
mod notifications;
mod payments;
mod quotes;
mod refunds;
mod requests;
mod wallet;

pub mod repository;

pub use models::*;

use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// 데이터베이스 연결 및 쿼리 담당
///
/// 앱 시작 시점에 1회 생성되어 `AppState`로 주입되는 DAO.
/// 각 엔티티의 쿼리는 `db/` 하위 모듈의 `impl Database` 블록에 나뉘어 있다.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10 (트래픽에 따라 조정)
    /// - min_connections: 1 (idle 시 최소 유지)
    /// - acquire_timeout: 3초 (커넥션 획득 대기)
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
