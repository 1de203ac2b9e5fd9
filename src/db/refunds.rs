//! Refund Queries
//!
//! 환불 상태 머신: 취소요청 → 환불진행중 → 환불완료/환불거절.
//! 환불완료는 대상 결제의 결제환불 전이와 같은 트랜잭션에서 처리된다.

use sqlx::PgConnection;
use uuid::Uuid;

use super::models::{NewNotification, NewRefund, Refund};
use super::notifications::insert_notification_on;
use super::payments::transition_payment_on;
use super::Database;
use crate::error::ApiError;
use crate::types::{PaymentStatus, RefundStatus};

const REFUND_COLUMNS: &str = r#"
    id, payment_id, guest_id, host_id, original_amount, refund_amount,
    refund_reason, status, requested_at, completed_at
"#;

/// 환불 행을 잠그고 상태 전이를 검증한 뒤 갱신한다
async fn transition_refund_on(
    conn: &mut PgConnection,
    id: Uuid,
    next: RefundStatus,
) -> Result<Refund, ApiError> {
    let current = sqlx::query_as::<_, Refund>(&format!(
        "SELECT {REFUND_COLUMNS} FROM refunds WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| ApiError::NotFound("refund".to_string()))?;

    let from = RefundStatus::parse(&current.status)?;
    if !from.can_transition_to(next) {
        return Err(ApiError::InvalidTransition {
            from: current.status,
            to: next.as_str().to_string(),
        });
    }

    let refund = sqlx::query_as::<_, Refund>(&format!(
        r#"
        UPDATE refunds SET
            status = $2,
            completed_at = CASE WHEN $3 THEN NOW() ELSE completed_at END
        WHERE id = $1
        RETURNING {REFUND_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(next.as_str())
    .bind(next.is_terminal())
    .fetch_one(conn)
    .await?;

    Ok(refund)
}

impl Database {
    /// 환불/취소 요청 생성 (상태 취소요청)
    ///
    /// 대상 결제가 결제완료 상태인지는 라우트에서 검증한다.
    pub async fn create_refund(
        &self,
        id: Uuid,
        guest_id: &str,
        host_id: &str,
        original_amount: i64,
        new: &NewRefund,
        notify: &NewNotification,
    ) -> Result<Refund, ApiError> {
        let mut tx = self.pool.begin().await?;

        let refund = sqlx::query_as::<_, Refund>(&format!(
            r#"
            INSERT INTO refunds (
                id, payment_id, guest_id, host_id, original_amount,
                refund_reason, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REFUND_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new.payment_id)
        .bind(guest_id)
        .bind(host_id)
        .bind(original_amount)
        .bind(&new.refund_reason)
        .bind(RefundStatus::Requested.as_str())
        .fetch_one(&mut *tx)
        .await?;

        insert_notification_on(&mut *tx, notify).await?;

        tx.commit().await?;
        Ok(refund)
    }

    /// 환불 단건 조회
    pub async fn get_refund(&self, id: Uuid) -> Result<Option<Refund>, ApiError> {
        let refund = sqlx::query_as::<_, Refund>(&format!(
            "SELECT {REFUND_COLUMNS} FROM refunds WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(refund)
    }

    /// 게스트의 환불 목록 (최신순)
    pub async fn list_refunds_by_guest(&self, guest_id: &str) -> Result<Vec<Refund>, ApiError> {
        let refunds = sqlx::query_as::<_, Refund>(&format!(
            "SELECT {REFUND_COLUMNS} FROM refunds WHERE guest_id = $1 ORDER BY requested_at DESC"
        ))
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(refunds)
    }

    /// 호스트의 환불 목록 (최신순)
    pub async fn list_refunds_by_host(&self, host_id: &str) -> Result<Vec<Refund>, ApiError> {
        let refunds = sqlx::query_as::<_, Refund>(&format!(
            "SELECT {REFUND_COLUMNS} FROM refunds WHERE host_id = $1 ORDER BY requested_at DESC"
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(refunds)
    }

    /// 환불 접수 (취소요청 → 환불진행중)
    pub async fn approve_refund(
        &self,
        id: Uuid,
        notify: &NewNotification,
    ) -> Result<Refund, ApiError> {
        let mut tx = self.pool.begin().await?;
        let refund = transition_refund_on(&mut *tx, id, RefundStatus::InProgress).await?;
        insert_notification_on(&mut *tx, notify).await?;
        tx.commit().await?;
        Ok(refund)
    }

    /// 환불 거절 (취소요청/환불진행중 → 환불거절, completed_at 기록)
    pub async fn reject_refund(
        &self,
        id: Uuid,
        notify: &NewNotification,
    ) -> Result<Refund, ApiError> {
        let mut tx = self.pool.begin().await?;
        let refund = transition_refund_on(&mut *tx, id, RefundStatus::Rejected).await?;
        insert_notification_on(&mut *tx, notify).await?;
        tx.commit().await?;
        Ok(refund)
    }

    /// 환불 완료
    ///
    /// 같은 트랜잭션 안에서:
    /// 1. 환불 행을 환불완료로 전이 (refund_amount 확정, completed_at 기록)
    /// 2. 대상 결제를 결제환불로 전이 (refunded_at 기록, paid_at은 유지)
    /// 3. 게스트 알림 insert
    pub async fn complete_refund(
        &self,
        id: Uuid,
        refund_amount: Option<i64>,
        notify: &NewNotification,
    ) -> Result<Refund, ApiError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Refund>(&format!(
            "SELECT {REFUND_COLUMNS} FROM refunds WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("refund".to_string()))?;

        let from = RefundStatus::parse(&current.status)?;
        if !from.can_transition_to(RefundStatus::Completed) {
            return Err(ApiError::InvalidTransition {
                from: current.status,
                to: RefundStatus::Completed.as_str().to_string(),
            });
        }

        // 환불 금액 미지정 시 원금 전액
        let amount = refund_amount.unwrap_or(current.original_amount);

        let refund = sqlx::query_as::<_, Refund>(&format!(
            r#"
            UPDATE refunds SET status = $2, refund_amount = $3, completed_at = NOW()
            WHERE id = $1
            RETURNING {REFUND_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(RefundStatus::Completed.as_str())
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        transition_payment_on(&mut *tx, refund.payment_id, PaymentStatus::Refunded).await?;
        insert_notification_on(&mut *tx, notify).await?;

        tx.commit().await?;
        Ok(refund)
    }
}
