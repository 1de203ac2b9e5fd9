//! Quote Queries
//!
//! 견적서 생성은 요청 상태 변경, 게스트 알림과 함께 하나의 트랜잭션으로 묶인다.
//! 열람 처리(미열람→열람)는 조건부 UPDATE로 구현되어 최초 1회만 전이된다.

use sqlx::types::Json;
use uuid::Uuid;

use super::models::{NewNotification, NewQuote, Quote};
use super::notifications::insert_notification_on;
use super::Database;
use crate::error::ApiError;
use crate::types::{QuoteStatus, RequestStatus};

const QUOTE_COLUMNS: &str = r#"
    id, request_id, guest_id, host_id, host, space_name, price, description,
    items, estimated_duration, status, created_at, updated_at
"#;

impl Database {
    /// 견적서 생성
    ///
    /// 같은 트랜잭션 안에서:
    /// 1. 견적서 insert (상태 미열람)
    /// 2. 대상 요청의 상태를 '견적서 발송 완료'로 변경
    /// 3. 게스트에게 알림 insert
    pub async fn create_quote(
        &self,
        id: Uuid,
        host_id: &str,
        guest_id: &str,
        new: &NewQuote,
        notify: &NewNotification,
    ) -> Result<Quote, ApiError> {
        let mut tx = self.pool.begin().await?;

        let quote = sqlx::query_as::<_, Quote>(&format!(
            r#"
            INSERT INTO quotes (
                id, request_id, guest_id, host_id, host, space_name, price,
                description, items, estimated_duration, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new.request_id)
        .bind(guest_id)
        .bind(host_id)
        .bind(Json(&new.host))
        .bind(&new.space_name)
        .bind(new.price)
        .bind(&new.description)
        .bind(Json(&new.items))
        .bind(&new.estimated_duration)
        .bind(QuoteStatus::Unread.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE requests SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(new.request_id)
            .bind(RequestStatus::Quoted.as_str())
            .execute(&mut *tx)
            .await?;

        insert_notification_on(&mut *tx, notify).await?;

        tx.commit().await?;
        Ok(quote)
    }

    /// 견적서 단건 조회
    pub async fn get_quote(&self, id: Uuid) -> Result<Option<Quote>, ApiError> {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    /// 요청에 달린 견적서 목록 (최신순)
    pub async fn list_quotes_by_request(&self, request_id: Uuid) -> Result<Vec<Quote>, ApiError> {
        let quotes = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE request_id = $1 ORDER BY created_at DESC"
        ))
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    /// 호스트가 발송한 견적서 목록 (최신순)
    pub async fn list_quotes_by_host(&self, host_id: &str) -> Result<Vec<Quote>, ApiError> {
        let quotes = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE host_id = $1 ORDER BY created_at DESC"
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    /// 게스트가 받은 견적서 목록 (최신순)
    pub async fn list_quotes_by_guest(&self, guest_id: &str) -> Result<Vec<Quote>, ApiError> {
        let quotes = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE guest_id = $1 ORDER BY created_at DESC"
        ))
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    /// 견적서 열람 처리
    ///
    /// 미열람 상태일 때만 열람으로 전이하고, 최초 전이 시에만 호스트 알림을
    /// 남긴다. 이미 열람된 견적서에는 아무 변화 없이 현재 행을 반환한다
    /// (역방향 전이는 존재하지 않는다).
    ///
    /// 반환값의 bool은 이번 호출로 전이가 일어났는지 여부.
    pub async fn mark_quote_read(
        &self,
        id: Uuid,
        notify_host: &NewNotification,
    ) -> Result<(Quote, bool), ApiError> {
        let mut tx = self.pool.begin().await?;

        let transitioned = sqlx::query_as::<_, Quote>(&format!(
            r#"
            UPDATE quotes SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(QuoteStatus::Read.as_str())
        .bind(QuoteStatus::Unread.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let result = match transitioned {
            Some(quote) => {
                insert_notification_on(&mut *tx, notify_host).await?;
                (quote, true)
            }
            None => {
                // 이미 열람됐거나 존재하지 않는 견적서
                let quote = sqlx::query_as::<_, Quote>(&format!(
                    "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::NotFound("quote".to_string()))?;
                (quote, false)
            }
        };

        tx.commit().await?;
        Ok(result)
    }
}
