//! Quote Endpoints
//!
//! 호스트가 요청에 견적서를 제출하고, 게스트가 열람한다.
//! 생성 시 요청 상태 변경과 게스트 알림이 한 트랜잭션으로 묶인다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::db::{NewQuote, Quote};
use crate::error::ApiError;
use crate::services::{notifier, AuthUser};
use crate::types::UserRole;
use crate::AppState;

/// POST /api/quotes
///
/// 호스트 전용. 대상 요청의 게스트가 수신자가 되고, 요청 상태는
/// '견적서 발송 완료'로 바뀐다.
pub async fn create_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewQuote>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    user.require_host()?;

    if payload.price < 0 {
        return Err(ApiError::Validation("price must be non-negative".to_string()));
    }

    let request = state
        .db
        .get_request(payload.request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("request".to_string()))?;

    let quote_id = Uuid::new_v4();
    let notify = notifier::quote_received(&request.user_id, &payload.space_name, quote_id);

    let quote = state
        .db
        .create_quote(quote_id, &user.id, &request.user_id, &payload, &notify)
        .await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

/// GET /api/requests/:id/quotes
///
/// 요청에 달린 견적서 목록. 요청 소유 게스트 또는 호스트만.
pub async fn list_quotes_by_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Vec<Quote>>, ApiError> {
    let request = state
        .db
        .get_request(request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("request".to_string()))?;

    if user.role == UserRole::Guest {
        user.require_owner(&request.user_id)?;
    }

    let quotes = state.db.list_quotes_by_request(request_id).await?;
    Ok(Json(quotes))
}

/// GET /api/quotes
///
/// 호스트: 본인이 발송한 견적서 / 게스트: 본인이 받은 견적서
pub async fn list_quotes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Quote>>, ApiError> {
    let quotes = match user.role {
        UserRole::Host => state.db.list_quotes_by_host(&user.id).await?,
        UserRole::Guest => state.db.list_quotes_by_guest(&user.id).await?,
    };
    Ok(Json(quotes))
}

/// GET /api/quotes/:id
pub async fn get_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Quote>, ApiError> {
    let quote = state
        .db
        .get_quote(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("quote".to_string()))?;

    let owner = match user.role {
        UserRole::Guest => &quote.guest_id,
        UserRole::Host => &quote.host_id,
    };
    user.require_owner(owner)?;

    Ok(Json(quote))
}

/// POST /api/quotes/:id/read
///
/// 게스트 열람 처리. 미열람 → 열람 전이는 최초 1회만 일어나고
/// 그때만 호스트에게 알림이 간다. 이미 열람된 견적서에는 멱등.
pub async fn mark_quote_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Quote>, ApiError> {
    user.require_guest()?;

    let quote = state
        .db
        .get_quote(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("quote".to_string()))?;
    user.require_owner(&quote.guest_id)?;

    let notify_host = notifier::quote_read(&quote.host_id, &quote.space_name, quote.id);
    let (quote, transitioned) = state.db.mark_quote_read(id, &notify_host).await?;

    if transitioned {
        tracing::debug!(quote_id = %quote.id, "quote marked as read");
    }
    Ok(Json(quote))
}
