//! Request Endpoints
//!
//! 게스트 공간 대여 요청 CRUD.
//! 게스트는 본인 요청만, 호스트는 견적 대상 탐색을 위해 전체 목록을 본다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::db::{NewRequest, Request, RequestPatch};
use crate::error::ApiError;
use crate::services::AuthUser;
use crate::types::UserRole;
use crate::AppState;

/// POST /api/requests
///
/// 요청 생성. 상태는 대기중으로 시작하고 id/타임스탬프는 서버가 채운다.
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewRequest>,
) -> Result<(StatusCode, Json<Request>), ApiError> {
    user.require_guest()?;

    if payload.space_type.trim().is_empty() {
        return Err(ApiError::Validation("spaceType is required".to_string()));
    }

    let request = state.db.create_request(&user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/requests
///
/// 호스트: 전체 요청 (견적 제출 대상 탐색)
/// 게스트: 본인 요청만
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Request>>, ApiError> {
    let requests = match user.role {
        UserRole::Host => state.db.list_requests().await?,
        UserRole::Guest => state.db.list_requests_by_user(&user.id).await?,
    };
    Ok(Json(requests))
}

/// GET /api/requests/:id
pub async fn get_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Request>, ApiError> {
    let request = state
        .db
        .get_request(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("request".to_string()))?;

    if user.role == UserRole::Guest {
        user.require_owner(&request.user_id)?;
    }
    Ok(Json(request))
}

/// PATCH /api/requests/:id
///
/// 제공된 필드만 덮어쓰는 shallow merge. 소유 게스트만 가능.
pub async fn update_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<RequestPatch>,
) -> Result<Json<Request>, ApiError> {
    user.require_guest()?;

    let existing = state
        .db
        .get_request(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("request".to_string()))?;
    user.require_owner(&existing.user_id)?;

    let updated = state.db.update_request(id, &patch).await?;
    Ok(Json(updated))
}

/// DELETE /api/requests/:id
///
/// 견적서는 CASCADE 삭제, 결제가 붙은 요청은 409로 거절된다.
pub async fn delete_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_guest()?;

    let existing = state
        .db
        .get_request(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("request".to_string()))?;
    user.require_owner(&existing.user_id)?;

    state.db.delete_request(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
