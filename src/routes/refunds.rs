//! Refund Endpoints
//!
//! 결제완료 건에 대한 취소 요청과 호스트의 환불 처리.
//! 환불완료는 대상 결제의 결제환불 전이와 한 트랜잭션으로 처리된다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{NewRefund, Refund};
use crate::error::ApiError;
use crate::services::{notifier, AuthUser};
use crate::types::{PaymentStatus, RefundStatus, UserRole};
use crate::AppState;

/// POST /api/refunds
///
/// 게스트의 취소 요청. 대상 결제가 결제완료 상태여야 한다.
pub async fn create_refund(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewRefund>,
) -> Result<(StatusCode, Json<Refund>), ApiError> {
    user.require_guest()?;

    if payload.refund_reason.trim().is_empty() {
        return Err(ApiError::Validation("refundReason is required".to_string()));
    }

    let payment = state
        .db
        .get_payment(payload.payment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("payment".to_string()))?;
    user.require_owner(&payment.guest_id)?;

    // 완료된 결제만 취소 요청 대상
    if PaymentStatus::parse(&payment.status)? != PaymentStatus::Completed {
        return Err(ApiError::InvalidTransition {
            from: payment.status,
            to: RefundStatus::Requested.as_str().to_string(),
        });
    }

    let refund_id = Uuid::new_v4();
    let notify = notifier::refund_requested(&payment.host_id, refund_id);

    let refund = state
        .db
        .create_refund(
            refund_id,
            &user.id,
            &payment.host_id,
            payment.amount,
            &payload,
            &notify,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(refund)))
}

/// GET /api/refunds
///
/// 게스트: 본인 요청 / 호스트: 수신 요청
pub async fn list_refunds(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Refund>>, ApiError> {
    let refunds = match user.role {
        UserRole::Guest => state.db.list_refunds_by_guest(&user.id).await?,
        UserRole::Host => state.db.list_refunds_by_host(&user.id).await?,
    };
    Ok(Json(refunds))
}

/// GET /api/refunds/:id
pub async fn get_refund(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Refund>, ApiError> {
    let refund = state
        .db
        .get_refund(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("refund".to_string()))?;

    let owner = match user.role {
        UserRole::Guest => &refund.guest_id,
        UserRole::Host => &refund.host_id,
    };
    user.require_owner(owner)?;

    Ok(Json(refund))
}

/// POST /api/refunds/:id/approve
///
/// 취소요청 → 환불진행중. 수신 호스트만.
pub async fn approve_refund(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Refund>, ApiError> {
    let refund = fetch_for_host(&state, &user, id).await?;

    let notify = notifier::refund_in_progress(&refund.guest_id, refund.id);
    let refund = state.db.approve_refund(id, &notify).await?;
    Ok(Json(refund))
}

/// 환불 완료 입력 (미지정 시 원금 전액)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRefundRequest {
    pub refund_amount: Option<i64>,
}

/// POST /api/refunds/:id/complete
///
/// 환불진행중 → 환불완료. 같은 트랜잭션에서 결제를 결제환불로 전이.
pub async fn complete_refund(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteRefundRequest>>,
) -> Result<Json<Refund>, ApiError> {
    let refund = fetch_for_host(&state, &user, id).await?;

    let requested_amount = payload.and_then(|Json(p)| p.refund_amount);
    if let Some(amount) = requested_amount {
        if amount <= 0 || amount > refund.original_amount {
            return Err(ApiError::Validation(
                "refundAmount must be positive and within the original amount".to_string(),
            ));
        }
    }

    let amount_for_notice = requested_amount.unwrap_or(refund.original_amount);
    let notify = notifier::refund_completed(&refund.guest_id, amount_for_notice, refund.id);

    let refund = state
        .db
        .complete_refund(id, requested_amount, &notify)
        .await?;
    Ok(Json(refund))
}

/// POST /api/refunds/:id/reject
///
/// 취소요청/환불진행중 → 환불거절.
pub async fn reject_refund(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Refund>, ApiError> {
    let refund = fetch_for_host(&state, &user, id).await?;

    let notify = notifier::refund_rejected(&refund.guest_id, refund.id);
    let refund = state.db.reject_refund(id, &notify).await?;
    Ok(Json(refund))
}

/// 수신 호스트만 통과
async fn fetch_for_host(state: &AppState, user: &AuthUser, id: Uuid) -> Result<Refund, ApiError> {
    user.require_host()?;

    let refund = state
        .db
        .get_refund(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("refund".to_string()))?;
    user.require_owner(&refund.host_id)?;

    Ok(refund)
}
