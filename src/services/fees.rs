//! Platform Fee Computation
//!
//! 플랫폼 수수료 5% 규칙. 수수료는 수수료 제외 금액(amount)에만 적용되며
//! 절대 복리로 계산되지 않는다.
//!
//! 반올림은 round-half-up: 정수 연산 `(amount * 5 + 50) / 100`은
//! 음수가 아닌 금액에 대해 `round(amount * 0.05)`와 동일하다.

/// 서비스 수수료 = round(amount * 0.05), 반올림
pub fn service_fee(amount: i64) -> i64 {
    debug_assert!(amount >= 0, "fee is defined for non-negative amounts");
    (amount * 5 + 50) / 100
}

/// 총 결제 금액 = amount + service_fee(amount)
pub fn total_amount(amount: i64) -> i64 {
    amount + service_fee(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_amounts() {
        // 150,000원 결제: 수수료 7,500원, 총액 157,500원
        assert_eq!(service_fee(150_000), 7_500);
        assert_eq!(total_amount(150_000), 157_500);
    }

    #[test]
    fn test_half_up_rounding() {
        // 1,010 * 0.05 = 50.5 → 51
        assert_eq!(service_fee(1_010), 51);
        // 10 * 0.05 = 0.5 → 1
        assert_eq!(service_fee(10), 1);
        // 9 * 0.05 = 0.45 → 0
        assert_eq!(service_fee(9), 0);
        // 30 * 0.05 = 1.5 → 2
        assert_eq!(service_fee(30), 2);
    }

    #[test]
    fn test_zero_amount() {
        assert_eq!(service_fee(0), 0);
        assert_eq!(total_amount(0), 0);
    }

    #[test]
    fn test_fee_is_not_compounded() {
        // 총액에 다시 수수료를 매기지 않는다
        let amount = 200_000;
        let total = total_amount(amount);
        assert_eq!(total, amount + service_fee(amount));
        assert_ne!(total, amount + service_fee(total));
    }

    #[test]
    fn test_fee_matches_float_rounding() {
        // 정수 연산이 round(amount * 0.05)와 일치하는지 구간 검증
        for amount in 0..10_000i64 {
            let expected = (amount as f64 * 0.05).round() as i64;
            assert_eq!(service_fee(amount), expected, "amount={}", amount);
        }
    }
}
