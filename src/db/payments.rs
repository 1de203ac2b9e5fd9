//! Payment Queries
//!
//! 결제 상태 머신(결제대기 → 결제완료/결제취소, 결제완료 → 결제환불)을
//! 행 잠금 + 전이 검증으로 강제한다. 견적서당 유효 결제 1건은
//! 부분 유니크 인덱스(uniq_payments_live_quote)가 보장한다.

use sqlx::PgConnection;
use uuid::Uuid;

use super::models::{NewNotification, Payment};
use super::notifications::insert_notification_on;
use super::Database;
use crate::error::ApiError;
use crate::types::PaymentStatus;

const PAYMENT_COLUMNS: &str = r#"
    id, quote_id, guest_id, host_id, amount, service_fee, total_amount,
    status, payment_method, created_at, paid_at, cancelled_at, refunded_at
"#;

/// 결제 상태 전이 (트랜잭션 내부용)
///
/// 대상 행을 FOR UPDATE로 잠근 뒤 현재 상태를 파싱해 전이 가능 여부를
/// 검증하고, 전이별 타임스탬프(paid_at/cancelled_at/refunded_at)를 찍는다.
pub(crate) async fn transition_payment_on(
    conn: &mut PgConnection,
    id: Uuid,
    next: PaymentStatus,
) -> Result<Payment, ApiError> {
    let current = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| ApiError::NotFound("payment".to_string()))?;

    let from = PaymentStatus::parse(&current.status)?;
    if !from.can_transition_to(next) {
        return Err(ApiError::InvalidTransition {
            from: current.status,
            to: next.as_str().to_string(),
        });
    }

    let stamp_column = match next {
        PaymentStatus::Completed => "paid_at",
        PaymentStatus::Cancelled => "cancelled_at",
        PaymentStatus::Refunded => "refunded_at",
        // Pending으로의 전이는 can_transition_to에서 걸러짐
        PaymentStatus::Pending => unreachable!("no transition into 결제대기"),
    };

    let payment = sqlx::query_as::<_, Payment>(&format!(
        r#"
        UPDATE payments SET status = $2, {stamp_column} = NOW()
        WHERE id = $1
        RETURNING {PAYMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(next.as_str())
    .fetch_one(conn)
    .await?;

    Ok(payment)
}

impl Database {
    /// 결제 생성
    ///
    /// 금액/수수료는 라우트에서 견적서 기준으로 산출해 전달한다.
    /// 같은 견적서에 유효 결제가 이미 있으면 DuplicatePayment.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_payment(
        &self,
        id: Uuid,
        quote_id: Uuid,
        guest_id: &str,
        host_id: &str,
        amount: i64,
        service_fee: i64,
        total_amount: i64,
        payment_method: &str,
        notify: &NewNotification,
    ) -> Result<Payment, ApiError> {
        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (
                id, quote_id, guest_id, host_id, amount, service_fee,
                total_amount, status, payment_method
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(quote_id)
        .bind(guest_id)
        .bind(host_id)
        .bind(amount)
        .bind(service_fee)
        .bind(total_amount)
        .bind(PaymentStatus::Pending.as_str())
        .bind(payment_method)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::DuplicatePayment,
            _ => ApiError::from(e),
        })?;

        insert_notification_on(&mut *tx, notify).await?;

        tx.commit().await?;
        Ok(payment)
    }

    /// 결제 단건 조회
    pub async fn get_payment(&self, id: Uuid) -> Result<Option<Payment>, ApiError> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// 게스트의 결제 목록 (최신순)
    pub async fn list_payments_by_guest(&self, guest_id: &str) -> Result<Vec<Payment>, ApiError> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE guest_id = $1 ORDER BY created_at DESC"
        ))
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// 호스트 기준 수신 결제 목록 (최신순)
    pub async fn list_payments_by_host(&self, host_id: &str) -> Result<Vec<Payment>, ApiError> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE host_id = $1 ORDER BY created_at DESC"
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// 결제 완료 (결제대기 → 결제완료, paid_at 기록)
    pub async fn complete_payment(
        &self,
        id: Uuid,
        notify: &NewNotification,
    ) -> Result<Payment, ApiError> {
        let mut tx = self.pool.begin().await?;
        let payment = transition_payment_on(&mut *tx, id, PaymentStatus::Completed).await?;
        insert_notification_on(&mut *tx, notify).await?;
        tx.commit().await?;
        Ok(payment)
    }

    /// 결제 취소 (결제대기 → 결제취소, cancelled_at 기록)
    pub async fn cancel_payment(
        &self,
        id: Uuid,
        notify: &NewNotification,
    ) -> Result<Payment, ApiError> {
        let mut tx = self.pool.begin().await?;
        let payment = transition_payment_on(&mut *tx, id, PaymentStatus::Cancelled).await?;
        insert_notification_on(&mut *tx, notify).await?;
        tx.commit().await?;
        Ok(payment)
    }
}
