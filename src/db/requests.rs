//! Request Queries
//!
//! 게스트 공간 대여 요청의 CRUD.
//! update는 제공된 필드만 덮어쓰는 shallow merge이며, 항상 updated_at을 갱신한다.

use uuid::Uuid;

use super::models::{NewRequest, Request, RequestPatch};
use super::Database;
use crate::error::ApiError;
use crate::types::RequestStatus;

const REQUEST_COLUMNS: &str = r#"
    id, user_id, original_query, space_type, purpose, capacity, equipment,
    catering, parking, additional_request, date, location, "time", category,
    status, created_at, updated_at
"#;

impl Database {
    /// 요청 생성 (상태는 항상 대기중으로 시작)
    pub async fn create_request(&self, user_id: &str, new: &NewRequest) -> Result<Request, ApiError> {
        let request = sqlx::query_as::<_, Request>(&format!(
            r#"
            INSERT INTO requests (
                id, user_id, original_query, space_type, purpose, capacity,
                equipment, catering, parking, additional_request, date,
                location, "time", category, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new.original_query)
        .bind(&new.space_type)
        .bind(&new.purpose)
        .bind(new.capacity)
        .bind(&new.equipment)
        .bind(new.catering)
        .bind(new.parking)
        .bind(&new.additional_request)
        .bind(new.date)
        .bind(&new.location)
        .bind(&new.time)
        .bind(&new.category)
        .bind(RequestStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// 요청 단건 조회
    pub async fn get_request(&self, id: Uuid) -> Result<Option<Request>, ApiError> {
        let request = sqlx::query_as::<_, Request>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// 전체 요청 목록 (호스트 뷰, 최신순)
    pub async fn list_requests(&self) -> Result<Vec<Request>, ApiError> {
        let requests = sqlx::query_as::<_, Request>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// 특정 게스트의 요청 목록 (최신순)
    pub async fn list_requests_by_user(&self, user_id: &str) -> Result<Vec<Request>, ApiError> {
        let requests = sqlx::query_as::<_, Request>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// 요청 수정 (shallow merge)
    ///
    /// 없는 id면 NotFound, 이때 저장소는 변경되지 않는다.
    pub async fn update_request(&self, id: Uuid, patch: &RequestPatch) -> Result<Request, ApiError> {
        let request = sqlx::query_as::<_, Request>(&format!(
            r#"
            UPDATE requests SET
                original_query = COALESCE($2, original_query),
                space_type = COALESCE($3, space_type),
                purpose = COALESCE($4, purpose),
                capacity = COALESCE($5, capacity),
                equipment = COALESCE($6, equipment),
                catering = COALESCE($7, catering),
                parking = COALESCE($8, parking),
                additional_request = COALESCE($9, additional_request),
                date = COALESCE($10, date),
                location = COALESCE($11, location),
                "time" = COALESCE($12, "time"),
                category = COALESCE($13, category),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.original_query)
        .bind(&patch.space_type)
        .bind(&patch.purpose)
        .bind(patch.capacity)
        .bind(&patch.equipment)
        .bind(patch.catering)
        .bind(patch.parking)
        .bind(&patch.additional_request)
        .bind(patch.date)
        .bind(&patch.location)
        .bind(&patch.time)
        .bind(&patch.category)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("request".to_string()))?;

        Ok(request)
    }

    /// 요청 삭제
    ///
    /// 견적서는 CASCADE로 함께 삭제되지만, 결제가 붙은 견적이 있으면
    /// RESTRICT 외래키에 걸려 Conflict로 거절된다.
    pub async fn delete_request(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    ApiError::Referenced("request".to_string())
                }
                _ => ApiError::from(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("request".to_string()));
        }
        Ok(())
    }
}
