//! Wallet Queries
//!
//! 호스트 캐시/포인트 잔액과 충전/사용 원장.
//!
//! 지갑 행을 FOR UPDATE로 잠근 뒤 잔액 갱신과 원장 append를 하나의
//! 트랜잭션으로 처리한다. 따라서 "잔액 == 최신 원장 항목의 balance"
//! 불변식이 항상 유지된다.

use super::models::{AutoChargePatch, AutoChargeSetting, CashHistoryEntry, NewNotification, Wallet};
use super::notifications::insert_notification_on;
use super::Database;
use crate::error::ApiError;

const HISTORY_COLUMNS: &str =
    "id, host_id, entry_type, amount, balance, method, description, created_at";

/// 캐시 차감 가능 여부 판정
///
/// 잔액이 부족하면 아무것도 변경하지 않고 실패한다 (fail-closed).
pub(crate) fn checked_deduction(balance: i64, requested: i64) -> Result<i64, ApiError> {
    if requested <= 0 {
        return Err(ApiError::Validation("amount must be positive".to_string()));
    }
    if balance < requested {
        return Err(ApiError::InsufficientBalance { balance, requested });
    }
    Ok(balance - requested)
}

impl Database {
    /// 지갑 조회
    ///
    /// 행이 없으면 0 잔액으로 읽힌다. 행 생성은 최초 변경 시점에 일어나며
    /// 조회가 쓰기를 유발하지 않는다.
    pub async fn get_wallet(&self, host_id: &str) -> Result<Wallet, ApiError> {
        let wallet = sqlx::query_as::<_, Wallet>(
            "SELECT host_id, cash, point, updated_at FROM wallets WHERE host_id = $1",
        )
        .bind(host_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet.unwrap_or_else(|| Wallet {
            host_id: host_id.to_string(),
            cash: 0,
            point: 0,
            updated_at: chrono::Utc::now(),
        }))
    }

    /// 캐시 충전
    ///
    /// 지갑 upsert(잔액 증가)와 원장 append(양수 금액, 충전 후 잔액 스냅샷),
    /// 호스트 알림을 하나의 트랜잭션으로 처리한다.
    pub async fn charge_cash(
        &self,
        host_id: &str,
        amount: i64,
        method: Option<&str>,
        description: &str,
        notify: &NewNotification,
    ) -> Result<(Wallet, CashHistoryEntry), ApiError> {
        if amount <= 0 {
            return Err(ApiError::Validation("amount must be positive".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let wallet = sqlx::query_as::<_, Wallet>(
            r#"
            INSERT INTO wallets (host_id, cash)
            VALUES ($1, $2)
            ON CONFLICT (host_id)
            DO UPDATE SET cash = wallets.cash + $2, updated_at = NOW()
            RETURNING host_id, cash, point, updated_at
            "#,
        )
        .bind(host_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        let entry = sqlx::query_as::<_, CashHistoryEntry>(&format!(
            r#"
            INSERT INTO cash_history (host_id, entry_type, amount, balance, method, description)
            VALUES ($1, 'charge', $2, $3, $4, $5)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(host_id)
        .bind(amount)
        .bind(wallet.cash)
        .bind(method)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        insert_notification_on(&mut *tx, notify).await?;

        tx.commit().await?;
        Ok((wallet, entry))
    }

    /// 캐시 차감
    ///
    /// 지갑 행을 잠근 뒤 잔액을 검증한다. 부족하면 지갑도 원장도 변경되지
    /// 않은 채 InsufficientBalance로 실패한다. 성공 시 원장에는 음수 금액과
    /// 차감 후 잔액 스냅샷이 기록된다.
    pub async fn deduct_cash(
        &self,
        host_id: &str,
        amount: i64,
        description: &str,
    ) -> Result<(Wallet, CashHistoryEntry), ApiError> {
        let mut tx = self.pool.begin().await?;

        let balance: i64 = sqlx::query_scalar("SELECT cash FROM wallets WHERE host_id = $1 FOR UPDATE")
            .bind(host_id)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0);

        let next_balance = checked_deduction(balance, amount)?;

        let wallet = sqlx::query_as::<_, Wallet>(
            r#"
            UPDATE wallets SET cash = $2, updated_at = NOW()
            WHERE host_id = $1
            RETURNING host_id, cash, point, updated_at
            "#,
        )
        .bind(host_id)
        .bind(next_balance)
        .fetch_one(&mut *tx)
        .await?;

        let entry = sqlx::query_as::<_, CashHistoryEntry>(&format!(
            r#"
            INSERT INTO cash_history (host_id, entry_type, amount, balance, description)
            VALUES ($1, 'use', $2, $3, $4)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(host_id)
        .bind(-amount)
        .bind(next_balance)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((wallet, entry))
    }

    /// 캐시 원장 조회 (최신순, 페이지네이션)
    pub async fn list_cash_history(
        &self,
        host_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<CashHistoryEntry>, i64), ApiError> {
        let offset = page * limit;

        let entries = sqlx::query_as::<_, CashHistoryEntry>(&format!(
            r#"
            SELECT {HISTORY_COLUMNS}
            FROM cash_history
            WHERE host_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(host_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cash_history WHERE host_id = $1")
            .bind(host_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((entries, count.0))
    }

    /// 자동 충전 설정 조회 (없으면 비활성 기본값)
    pub async fn get_auto_charge(&self, host_id: &str) -> Result<AutoChargeSetting, ApiError> {
        let setting = sqlx::query_as::<_, AutoChargeSetting>(
            r#"
            SELECT host_id, enabled, threshold, charge_amount, method, updated_at
            FROM auto_charge_settings
            WHERE host_id = $1
            "#,
        )
        .bind(host_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting.unwrap_or_else(|| AutoChargeSetting {
            host_id: host_id.to_string(),
            enabled: false,
            threshold: 0,
            charge_amount: 0,
            method: None,
            updated_at: chrono::Utc::now(),
        }))
    }

    /// 자동 충전 설정 upsert
    pub async fn upsert_auto_charge(
        &self,
        host_id: &str,
        patch: &AutoChargePatch,
    ) -> Result<AutoChargeSetting, ApiError> {
        let setting = sqlx::query_as::<_, AutoChargeSetting>(
            r#"
            INSERT INTO auto_charge_settings (host_id, enabled, threshold, charge_amount, method)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (host_id)
            DO UPDATE SET
                enabled = EXCLUDED.enabled,
                threshold = EXCLUDED.threshold,
                charge_amount = EXCLUDED.charge_amount,
                method = EXCLUDED.method,
                updated_at = NOW()
            RETURNING host_id, enabled, threshold, charge_amount, method, updated_at
            "#,
        )
        .bind(host_id)
        .bind(patch.enabled)
        .bind(patch.threshold)
        .bind(patch.charge_amount)
        .bind(&patch.method)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduction_within_balance() {
        assert_eq!(checked_deduction(10000, 3000).unwrap(), 7000);
        assert_eq!(checked_deduction(5000, 5000).unwrap(), 0);
    }

    #[test]
    fn test_deduction_fails_closed_on_insufficient_balance() {
        // 잔액 3000에서 5000 차감 시도 → 변경 없이 실패
        let err = checked_deduction(3000, 5000).unwrap_err();
        match err {
            ApiError::InsufficientBalance { balance, requested } => {
                assert_eq!(balance, 3000);
                assert_eq!(requested, 5000);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_deduction_rejects_non_positive_amount() {
        assert!(checked_deduction(10000, 0).is_err());
        assert!(checked_deduction(10000, -100).is_err());
    }
}
