//! Status State Machines
//!
//! 각 엔티티의 상태는 DB에 원본 한국어 문자열(TEXT)로 저장되고,
//! 코드에서는 enum으로 파싱해 전이 규칙을 검증한다.
//!
//! # Interview Q&A
//!
//! Q: 상태를 DB enum이 아닌 TEXT로 저장한 이유는?
//! A: 한국어 상태 문자열이 클라이언트 계약의 일부
//!    - 프론트엔드가 "결제대기" 같은 원문 문자열을 그대로 표시
//!    - TEXT + 코드 레벨 파싱이 마이그레이션 비용 최소
//!    - 전이 검증은 어차피 애플리케이션 레이어에서 수행
//!
//! Q: 상태 전이는 어디서 검증하는가?
//! A: `can_transition_to`를 DB 트랜잭션 안에서 호출
//!    - 행을 FOR UPDATE로 잠근 뒤 현재 상태 파싱
//!    - 허용되지 않는 전이는 409 Conflict로 거절
//!    - 클라이언트는 전이를 요청만 할 수 있고, 허용 여부는 항상 서버가 판정

use crate::error::ApiError;

/// 요청 상태: 대기중 → 견적서 발송 완료
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// 대기중
    Pending,
    /// 견적서 발송 완료
    Quoted,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "대기중",
            RequestStatus::Quoted => "견적서 발송 완료",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "대기중" => Ok(RequestStatus::Pending),
            "견적서 발송 완료" => Ok(RequestStatus::Quoted),
            other => Err(ApiError::Validation(format!("unknown request status: {}", other))),
        }
    }
}

/// 견적서 열람 상태: 미열람 → 열람 (단방향, 1회)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStatus {
    /// 미열람
    Unread,
    /// 열람
    Read,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Unread => "미열람",
            QuoteStatus::Read => "열람",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "미열람" => Ok(QuoteStatus::Unread),
            "열람" => Ok(QuoteStatus::Read),
            other => Err(ApiError::Validation(format!("unknown quote status: {}", other))),
        }
    }

    /// 열람 상태는 되돌릴 수 없다
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        matches!((self, next), (QuoteStatus::Unread, QuoteStatus::Read))
    }
}

/// 결제 상태 머신
///
/// ```text
/// 결제대기 ──▶ 결제완료 ──▶ 결제환불
///     │
///     └─────▶ 결제취소
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// 결제대기
    Pending,
    /// 결제완료
    Completed,
    /// 결제취소
    Cancelled,
    /// 결제환불
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "결제대기",
            PaymentStatus::Completed => "결제완료",
            PaymentStatus::Cancelled => "결제취소",
            PaymentStatus::Refunded => "결제환불",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "결제대기" => Ok(PaymentStatus::Pending),
            "결제완료" => Ok(PaymentStatus::Completed),
            "결제취소" => Ok(PaymentStatus::Cancelled),
            "결제환불" => Ok(PaymentStatus::Refunded),
            other => Err(ApiError::Validation(format!("unknown payment status: {}", other))),
        }
    }

    /// 전방향 전이만 허용
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Cancelled)
                | (PaymentStatus::Completed, PaymentStatus::Refunded)
        )
    }
}

/// 환불 상태 머신
///
/// ```text
/// 취소요청 ──▶ 환불진행중 ──▶ 환불완료
///     │            │
///     └────────────┴──────▶ 환불거절
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundStatus {
    /// 취소요청
    Requested,
    /// 환불진행중
    InProgress,
    /// 환불완료
    Completed,
    /// 환불거절
    Rejected,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::Requested => "취소요청",
            RefundStatus::InProgress => "환불진행중",
            RefundStatus::Completed => "환불완료",
            RefundStatus::Rejected => "환불거절",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "취소요청" => Ok(RefundStatus::Requested),
            "환불진행중" => Ok(RefundStatus::InProgress),
            "환불완료" => Ok(RefundStatus::Completed),
            "환불거절" => Ok(RefundStatus::Rejected),
            other => Err(ApiError::Validation(format!("unknown refund status: {}", other))),
        }
    }

    pub fn can_transition_to(self, next: RefundStatus) -> bool {
        matches!(
            (self, next),
            (RefundStatus::Requested, RefundStatus::InProgress)
                | (RefundStatus::Requested, RefundStatus::Rejected)
                | (RefundStatus::InProgress, RefundStatus::Completed)
                | (RefundStatus::InProgress, RefundStatus::Rejected)
        )
    }

    /// 완료/거절 시점에 completed_at을 찍는다
    pub fn is_terminal(self) -> bool {
        matches!(self, RefundStatus::Completed | RefundStatus::Rejected)
    }
}

/// 알림 종류 (10종)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    QuoteReceived,
    QuoteRead,
    PaymentRequested,
    PaymentCompleted,
    PaymentCancelled,
    RefundRequested,
    RefundInProgress,
    RefundCompleted,
    RefundRejected,
    CashCharged,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::QuoteReceived => "quote_received",
            NotificationType::QuoteRead => "quote_read",
            NotificationType::PaymentRequested => "payment_requested",
            NotificationType::PaymentCompleted => "payment_completed",
            NotificationType::PaymentCancelled => "payment_cancelled",
            NotificationType::RefundRequested => "refund_requested",
            NotificationType::RefundInProgress => "refund_in_progress",
            NotificationType::RefundCompleted => "refund_completed",
            NotificationType::RefundRejected => "refund_rejected",
            NotificationType::CashCharged => "cash_charged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_forward_transitions() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Cancelled));
        assert!(PaymentStatus::Completed.can_transition_to(PaymentStatus::Refunded));
    }

    #[test]
    fn test_payment_invalid_transitions() {
        // 취소된 결제는 완료/환불 불가
        assert!(!PaymentStatus::Cancelled.can_transition_to(PaymentStatus::Completed));
        assert!(!PaymentStatus::Cancelled.can_transition_to(PaymentStatus::Refunded));
        // 대기 중 결제는 바로 환불 불가
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Refunded));
        // 역방향 전이 없음
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Pending));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Completed));
    }

    #[test]
    fn test_quote_read_state_is_monotonic() {
        // 미열람 → 열람은 1회만, 역방향 전이는 존재하지 않는다
        assert!(QuoteStatus::Unread.can_transition_to(QuoteStatus::Read));
        assert!(!QuoteStatus::Read.can_transition_to(QuoteStatus::Unread));
        assert!(!QuoteStatus::Read.can_transition_to(QuoteStatus::Read));
    }

    #[test]
    fn test_refund_transitions() {
        assert!(RefundStatus::Requested.can_transition_to(RefundStatus::InProgress));
        assert!(RefundStatus::InProgress.can_transition_to(RefundStatus::Completed));
        assert!(RefundStatus::InProgress.can_transition_to(RefundStatus::Rejected));
        // 거절은 접수 직후에도 가능
        assert!(RefundStatus::Requested.can_transition_to(RefundStatus::Rejected));
        // 완료/거절 이후에는 어떤 전이도 불가
        assert!(!RefundStatus::Completed.can_transition_to(RefundStatus::Rejected));
        assert!(!RefundStatus::Rejected.can_transition_to(RefundStatus::InProgress));
        // 진행 단계를 건너뛴 완료 불가
        assert!(!RefundStatus::Requested.can_transition_to(RefundStatus::Completed));
    }

    #[test]
    fn test_status_roundtrip() {
        for s in ["결제대기", "결제완료", "결제취소", "결제환불"] {
            assert_eq!(PaymentStatus::parse(s).unwrap().as_str(), s);
        }
        for s in ["취소요청", "환불진행중", "환불완료", "환불거절"] {
            assert_eq!(RefundStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(PaymentStatus::parse("pending").is_err());
    }
}
