//! Payment Endpoints
//!
//! 견적서에 대한 결제 생성과 상태 전이.
//! 금액/수수료/총액은 항상 서버가 견적서 기준으로 산출한다 — 클라이언트가
//! 보낸 금액을 신뢰하지 않는다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::db::{NewPayment, Payment};
use crate::error::ApiError;
use crate::services::{fees, notifier, AuthUser};
use crate::types::UserRole;
use crate::AppState;

/// POST /api/payments
///
/// 게스트 체크아웃. 같은 견적서에 유효 결제가 이미 있으면 409.
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewPayment>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    user.require_guest()?;

    if payload.payment_method.trim().is_empty() {
        return Err(ApiError::Validation("paymentMethod is required".to_string()));
    }

    let quote = state
        .db
        .get_quote(payload.quote_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("quote".to_string()))?;
    user.require_owner(&quote.guest_id)?;

    let amount = quote.price;
    let service_fee = fees::service_fee(amount);
    let total_amount = fees::total_amount(amount);

    let payment_id = Uuid::new_v4();
    let notify = notifier::payment_requested(&quote.host_id, total_amount, payment_id);

    let payment = state
        .db
        .create_payment(
            payment_id,
            quote.id,
            &user.id,
            &quote.host_id,
            amount,
            service_fee,
            total_amount,
            &payload.payment_method,
            &notify,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET /api/payments
///
/// 게스트: 본인 결제 / 호스트: 수신 결제
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let payments = match user.role {
        UserRole::Guest => state.db.list_payments_by_guest(&user.id).await?,
        UserRole::Host => state.db.list_payments_by_host(&user.id).await?,
    };
    Ok(Json(payments))
}

/// GET /api/payments/:id
pub async fn get_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    let payment = fetch_for_participant(&state, &user, id).await?;
    Ok(Json(payment))
}

/// POST /api/payments/:id/complete
///
/// 결제대기 → 결제완료, paid_at 기록. 소유 게스트만.
pub async fn complete_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    user.require_guest()?;
    let payment = fetch_for_participant(&state, &user, id).await?;

    let notify = notifier::payment_completed(&payment.host_id, payment.total_amount, payment.id);
    let payment = state.db.complete_payment(id, &notify).await?;
    Ok(Json(payment))
}

/// POST /api/payments/:id/cancel
///
/// 결제대기 → 결제취소, cancelled_at 기록. 소유 게스트만.
pub async fn cancel_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    user.require_guest()?;
    let payment = fetch_for_participant(&state, &user, id).await?;

    let notify = notifier::payment_cancelled(&payment.host_id, payment.id);
    let payment = state.db.cancel_payment(id, &notify).await?;
    Ok(Json(payment))
}

/// 결제 당사자(게스트 소유자 또는 수신 호스트)만 통과
async fn fetch_for_participant(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> Result<Payment, ApiError> {
    let payment = state
        .db
        .get_payment(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("payment".to_string()))?;

    let owner = match user.role {
        UserRole::Guest => &payment.guest_id,
        UserRole::Host => &payment.host_id,
    };
    user.require_owner(owner)?;

    Ok(payment)
}
