//! Notification Composition
//!
//! 도메인 이벤트별 알림(제목/내용/링크)을 조립한다.
//! 알림 insert 자체는 각 이벤트를 처리하는 DB 트랜잭션 안에서 수행되므로,
//! 여기서는 내용만 만든다.

use uuid::Uuid;

use crate::db::NewNotification;
use crate::types::NotificationType;

/// 게스트: 새 견적서 도착
pub fn quote_received(guest_id: &str, space_name: &str, quote_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: guest_id.to_string(),
        notification_type: NotificationType::QuoteReceived,
        title: "새 견적서가 도착했습니다".to_string(),
        content: format!("{} 공간에 대한 견적서가 도착했습니다.", space_name),
        link: Some(format!("/quotes/{}", quote_id)),
    }
}

/// 호스트: 견적서 열람됨
pub fn quote_read(host_id: &str, space_name: &str, quote_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: host_id.to_string(),
        notification_type: NotificationType::QuoteRead,
        title: "견적서가 열람되었습니다".to_string(),
        content: format!("게스트가 {} 견적서를 확인했습니다.", space_name),
        link: Some(format!("/quotes/{}", quote_id)),
    }
}

/// 호스트: 결제 시작
pub fn payment_requested(host_id: &str, total_amount: i64, payment_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: host_id.to_string(),
        notification_type: NotificationType::PaymentRequested,
        title: "결제가 시작되었습니다".to_string(),
        content: format!("{}원 결제가 접수되었습니다.", format_amount(total_amount)),
        link: Some(format!("/payments/{}", payment_id)),
    }
}

/// 호스트: 결제 완료
pub fn payment_completed(host_id: &str, total_amount: i64, payment_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: host_id.to_string(),
        notification_type: NotificationType::PaymentCompleted,
        title: "결제가 완료되었습니다".to_string(),
        content: format!("{}원 결제가 완료되었습니다.", format_amount(total_amount)),
        link: Some(format!("/payments/{}", payment_id)),
    }
}

/// 호스트: 결제 취소
pub fn payment_cancelled(host_id: &str, payment_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: host_id.to_string(),
        notification_type: NotificationType::PaymentCancelled,
        title: "결제가 취소되었습니다".to_string(),
        content: "진행 중이던 결제가 취소되었습니다.".to_string(),
        link: Some(format!("/payments/{}", payment_id)),
    }
}

/// 호스트: 환불 요청 접수
pub fn refund_requested(host_id: &str, refund_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: host_id.to_string(),
        notification_type: NotificationType::RefundRequested,
        title: "취소 요청이 접수되었습니다".to_string(),
        content: "게스트가 결제 취소를 요청했습니다.".to_string(),
        link: Some(format!("/refunds/{}", refund_id)),
    }
}

/// 게스트: 환불 진행 시작
pub fn refund_in_progress(guest_id: &str, refund_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: guest_id.to_string(),
        notification_type: NotificationType::RefundInProgress,
        title: "환불이 진행 중입니다".to_string(),
        content: "요청하신 환불 처리가 시작되었습니다.".to_string(),
        link: Some(format!("/refunds/{}", refund_id)),
    }
}

/// 게스트: 환불 완료
pub fn refund_completed(guest_id: &str, refund_amount: i64, refund_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: guest_id.to_string(),
        notification_type: NotificationType::RefundCompleted,
        title: "환불이 완료되었습니다".to_string(),
        content: format!("{}원이 환불되었습니다.", format_amount(refund_amount)),
        link: Some(format!("/refunds/{}", refund_id)),
    }
}

/// 게스트: 환불 거절
pub fn refund_rejected(guest_id: &str, refund_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: guest_id.to_string(),
        notification_type: NotificationType::RefundRejected,
        title: "환불 요청이 거절되었습니다".to_string(),
        content: "환불 요청이 거절되었습니다. 자세한 내용은 문의해 주세요.".to_string(),
        link: Some(format!("/refunds/{}", refund_id)),
    }
}

/// 호스트: 캐시 충전 완료
pub fn cash_charged(host_id: &str, amount: i64) -> NewNotification {
    NewNotification {
        user_id: host_id.to_string(),
        notification_type: NotificationType::CashCharged,
        title: "캐시 충전이 완료되었습니다".to_string(),
        content: format!("{}원이 충전되었습니다.", format_amount(amount)),
        link: Some("/wallet".to_string()),
    }
}

/// 천 단위 콤마 포맷
fn format_amount(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }
    if amount < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(7_500), "7,500");
        assert_eq!(format_amount(157_500), "157,500");
        assert_eq!(format_amount(1_000_000), "1,000,000");
        assert_eq!(format_amount(-3_000), "-3,000");
    }

    #[test]
    fn test_notification_recipients() {
        let quote_id = Uuid::new_v4();
        // 견적 도착은 게스트에게, 열람 알림은 호스트에게
        assert_eq!(quote_received("g-1", "파티룸", quote_id).user_id, "g-1");
        assert_eq!(quote_read("h-1", "파티룸", quote_id).user_id, "h-1");
    }
}
