//! Wallet Endpoints
//!
//! 호스트 전용: 잔액 조회, 캐시 충전/차감, 원장 조회, 자동 충전 설정.
//! 차감은 잔액 부족 시 아무것도 변경하지 않고 422로 실패한다.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::{AutoChargePatch, AutoChargeSetting, CashHistoryEntry, Wallet};
use crate::error::ApiError;
use crate::services::{notifier, AuthUser};
use crate::types::Pagination;
use crate::AppState;

/// GET /api/wallet
///
/// 잔액 {cash, point}. 지갑 행이 없으면 0으로 읽힌다.
pub async fn get_wallet(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Wallet>, ApiError> {
    user.require_host()?;
    let wallet = state.db.get_wallet(&user.id).await?;
    Ok(Json(wallet))
}

/// 충전 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub amount: i64,
    pub method: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// 지갑 변경 응답 (갱신된 잔액 + 원장 항목)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMutationResponse {
    pub wallet: Wallet,
    pub entry: CashHistoryEntry,
}

/// POST /api/wallet/charge
pub async fn charge_cash(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChargeRequest>,
) -> Result<Json<WalletMutationResponse>, ApiError> {
    user.require_host()?;

    let description = payload
        .description
        .unwrap_or_else(|| "캐시 충전".to_string());
    let notify = notifier::cash_charged(&user.id, payload.amount);

    let (wallet, entry) = state
        .db
        .charge_cash(
            &user.id,
            payload.amount,
            payload.method.as_deref(),
            &description,
            &notify,
        )
        .await?;
    Ok(Json(WalletMutationResponse { wallet, entry }))
}

/// 차감 요청
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductRequest {
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/wallet/deduct
pub async fn deduct_cash(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DeductRequest>,
) -> Result<Json<WalletMutationResponse>, ApiError> {
    user.require_host()?;

    let description = payload
        .description
        .unwrap_or_else(|| "캐시 사용".to_string());

    let (wallet, entry) = state
        .db
        .deduct_cash(&user.id, payload.amount, &description)
        .await?;
    Ok(Json(WalletMutationResponse { wallet, entry }))
}

/// 원장 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// 페이지 (0부터 시작)
    pub page: Option<u32>,
    /// 페이지 크기 (기본 20, 최대 100)
    pub limit: Option<u32>,
}

/// 원장 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub entries: Vec<CashHistoryEntry>,
    pub pagination: Pagination,
}

/// GET /api/wallet/history
///
/// 원장 최신순, 페이지네이션.
pub async fn list_history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    user.require_host()?;

    let page = query.page.unwrap_or(0);
    let limit = query.limit.unwrap_or(20).min(100);

    let (entries, total) = state.db.list_cash_history(&user.id, page, limit).await?;

    Ok(Json(HistoryResponse {
        entries,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// GET /api/wallet/auto-charge
pub async fn get_auto_charge(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<AutoChargeSetting>, ApiError> {
    user.require_host()?;
    let setting = state.db.get_auto_charge(&user.id).await?;
    Ok(Json(setting))
}

/// PUT /api/wallet/auto-charge
pub async fn update_auto_charge(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AutoChargePatch>,
) -> Result<Json<AutoChargeSetting>, ApiError> {
    user.require_host()?;

    if payload.enabled && (payload.threshold < 0 || payload.charge_amount <= 0) {
        return Err(ApiError::Validation(
            "threshold must be non-negative and chargeAmount positive".to_string(),
        ));
    }

    let setting = state.db.upsert_auto_charge(&user.id, &payload).await?;
    Ok(Json(setting))
}
