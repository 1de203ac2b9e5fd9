//! Notification Queries
//!
//! 사용자별 알림 피드. append + 읽음 플래그 변경 + 삭제만 존재한다.
//! 목록은 항상 최신순으로 조회하고, 미읽음 개수는 매 호출 시 다시 센다
//! (캐시 카운터 없음).

use uuid::Uuid;

use super::models::{NewNotification, Notification};
use super::Database;
use crate::error::ApiError;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, notification_type, title, content, link, is_read, created_at";

/// 알림 insert
///
/// 도메인 이벤트(견적 발송, 결제, 환불 등)를 처리하는 트랜잭션 안에서도
/// 호출할 수 있도록 executor를 받는다.
pub(crate) async fn insert_notification_on<'e, E>(
    executor: E,
    new: &NewNotification,
) -> Result<Notification, ApiError>
where
    E: sqlx::PgExecutor<'e>,
{
    let notification = sqlx::query_as::<_, Notification>(&format!(
        r#"
        INSERT INTO notifications (id, user_id, notification_type, title, content, link)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {NOTIFICATION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.user_id)
    .bind(new.notification_type.as_str())
    .bind(&new.title)
    .bind(&new.content)
    .bind(&new.link)
    .fetch_one(executor)
    .await?;

    Ok(notification)
}

impl Database {
    /// 알림 생성 (단독 호출용)
    pub async fn create_notification(&self, new: &NewNotification) -> Result<Notification, ApiError> {
        insert_notification_on(&self.pool, new).await
    }

    /// 사용자의 알림 목록 (최신순)
    pub async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>, ApiError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// 미읽음 개수 (매번 재계산)
    pub async fn unread_notification_count(&self, user_id: &str) -> Result<i64, ApiError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// 알림 읽음 처리 (본인 알림만)
    pub async fn mark_notification_read(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> Result<Notification, ApiError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("notification".to_string()))?;

        Ok(notification)
    }

    /// 전체 읽음 처리, 변경된 건수 반환
    pub async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64, ApiError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// 알림 삭제 (본인 알림만)
    pub async fn delete_notification(&self, id: Uuid, user_id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("notification".to_string()));
        }
        Ok(())
    }
}
