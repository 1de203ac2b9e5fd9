//! Notification Endpoints
//!
//! 본인 알림 피드 조회(최신순), 읽음 처리, 삭제.
//! 알림 생성 엔드포인트는 없다 — 알림은 도메인 이벤트의 부수효과로만 생긴다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db::Notification;
use crate::error::ApiError;
use crate::services::AuthUser;
use crate::AppState;

/// GET /api/notifications
///
/// 본인 알림, 최신순.
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state.db.list_notifications(&user.id).await?;
    Ok(Json(notifications))
}

/// 미읽음 개수 응답
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// GET /api/notifications/unread-count
///
/// 매 호출마다 재계산 (캐시 카운터 없음).
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = state.db.unread_notification_count(&user.id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
    let notification = state.db.mark_notification_read(id, &user.id).await?;
    Ok(Json(notification))
}

/// 전체 읽음 처리 응답
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = state.db.mark_all_notifications_read(&user.id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_notification(id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
