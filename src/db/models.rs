//! Database Models
//!
//! 여섯 엔티티의 행(row) 모델과 생성/수정 입력 모델.
//! JSON 직렬화는 프론트엔드 계약(camelCase)을 따르고,
//! 컬럼 매핑은 snake_case 필드명을 그대로 사용한다.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

// ============ Request ============

/// 게스트 공간 대여 요청
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: Uuid,
    pub user_id: String,
    /// 인테이크 폼의 원문 질의
    pub original_query: String,
    pub space_type: String,
    pub purpose: String,
    pub capacity: i32,
    pub equipment: Vec<String>,
    pub catering: bool,
    pub parking: bool,
    pub additional_request: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub time: String,
    pub category: String,
    /// 대기중 | 견적서 발송 완료
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 요청 생성 입력
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    #[serde(default)]
    pub original_query: String,
    pub space_type: String,
    pub purpose: String,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub catering: bool,
    #[serde(default)]
    pub parking: bool,
    pub additional_request: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub category: String,
}

/// 요청 수정 입력 (제공된 필드만 덮어쓰는 shallow merge)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPatch {
    pub original_query: Option<String>,
    pub space_type: Option<String>,
    pub purpose: Option<String>,
    pub capacity: Option<i32>,
    pub equipment: Option<Vec<String>>,
    pub catering: Option<bool>,
    pub parking: Option<bool>,
    pub additional_request: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub time: Option<String>,
    pub category: Option<String>,
}

// ============ Quote ============

/// 호스트 표시용 스냅샷 (견적서에 비정규화 저장)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostProfile {
    pub name: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
}

/// 견적 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub name: String,
    pub price: i64,
}

/// 호스트 견적서
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub request_id: Uuid,
    pub guest_id: String,
    pub host_id: String,
    pub host: Json<HostProfile>,
    pub space_name: String,
    pub price: i64,
    pub description: String,
    pub items: Json<Vec<QuoteItem>>,
    pub estimated_duration: String,
    /// 미열람 | 열람
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 견적서 생성 입력
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    pub request_id: Uuid,
    pub host: HostProfile,
    pub space_name: String,
    pub price: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<QuoteItem>,
    #[serde(default)]
    pub estimated_duration: String,
}

// ============ Payment ============

/// 결제
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub guest_id: String,
    pub host_id: String,
    /// 견적 금액 (수수료 제외)
    pub amount: i64,
    /// round(amount * 0.05), 반올림
    pub service_fee: i64,
    /// amount + service_fee
    pub total_amount: i64,
    /// 결제대기 | 결제완료 | 결제취소 | 결제환불
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
}

/// 결제 생성 입력 (금액은 견적서에서 서버가 산출)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub quote_id: Uuid,
    pub payment_method: String,
}

// ============ Refund ============

/// 환불/취소 요청
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub guest_id: String,
    pub host_id: String,
    pub original_amount: i64,
    pub refund_amount: Option<i64>,
    pub refund_reason: String,
    /// 취소요청 | 환불진행중 | 환불완료 | 환불거절
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// 환불 요청 입력
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRefund {
    pub payment_id: Uuid,
    pub refund_reason: String,
}

// ============ Notification ============

/// 사용자 알림
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub notification_type: String,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// 알림 생성 입력 (도메인 이벤트의 부수효과로만 생성됨)
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub notification_type: crate::types::NotificationType,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
}

// ============ Wallet ============

/// 호스트 지갑 잔액
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub host_id: String,
    pub cash: i64,
    pub point: i64,
    pub updated_at: DateTime<Utc>,
}

/// 캐시 원장 항목 (거래 직후 잔액 스냅샷 포함)
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashHistoryEntry {
    pub id: i64,
    pub host_id: String,
    /// charge | use
    pub entry_type: String,
    /// 부호 있는 금액: 충전 양수, 사용 음수
    pub amount: i64,
    /// 거래 직후 잔액
    pub balance: i64,
    pub method: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// 자동 충전 설정
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoChargeSetting {
    pub host_id: String,
    pub enabled: bool,
    /// 잔액이 이 값 미만이면 자동 충전 대상
    pub threshold: i64,
    pub charge_amount: i64,
    pub method: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// 자동 충전 설정 입력
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoChargePatch {
    pub enabled: bool,
    pub threshold: i64,
    pub charge_amount: i64,
    pub method: Option<String>,
}
