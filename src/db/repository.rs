//! Repository Pattern Implementation
//!
//! # Interview Q&A
//!
//! Q: Repository 패턴이란?
//! A: 데이터 접근 로직을 추상화하는 패턴
//!
//!    장점:
//!    - 비즈니스 로직과 데이터 접근 분리
//!    - 테스트 시 Mock 구현 쉬움
//!    - DB 교체 시 영향 최소화
//!
//! Q: 현재 코드에서 라우트가 trait이 아닌 Database를 직접 쓰는 이유는?
//! A: 단일 DB(PostgreSQL)만 사용하는 단계에서 오버엔지니어링 방지
//!    - Database 구조체가 곧 주입되는 DAO (AppState 경유)
//!    - 상태 머신/수수료/원장 계산은 순수 함수로 분리되어 있어
//!      trait 없이도 핵심 규칙은 단위 테스트 가능
//!    - 아래 trait + Mock은 저장 계층 계약(생성 기본값, 부재 id 무변경,
//!      열람 단조성, 원장 불변식)을 인메모리로 검증하는 용도

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{CashHistoryEntry, Payment, Quote};
use crate::error::ApiError;
use crate::types::{PaymentStatus, QuoteStatus};

/// Quote Repository 인터페이스
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, ApiError>;
    async fn find_by_request(&self, request_id: Uuid) -> Result<Vec<Quote>, ApiError>;
    async fn save(&self, quote: &Quote) -> Result<(), ApiError>;
    /// 미열람 → 열람 (최초 1회만, 역방향 없음)
    async fn mark_read(&self, id: Uuid) -> Result<Quote, ApiError>;
}

/// Payment Repository 인터페이스
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, ApiError>;
    async fn save(&self, payment: &Payment) -> Result<(), ApiError>;
    /// 상태 전이 (검증 포함, 전이별 타임스탬프 기록)
    async fn transition(&self, id: Uuid, next: PaymentStatus) -> Result<Payment, ApiError>;
}

/// Wallet Repository 인터페이스
#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn balance(&self, host_id: &str) -> Result<i64, ApiError>;
    async fn charge(&self, host_id: &str, amount: i64) -> Result<CashHistoryEntry, ApiError>;
    /// 잔액 부족 시 아무것도 변경하지 않고 실패
    async fn deduct(&self, host_id: &str, amount: i64) -> Result<CashHistoryEntry, ApiError>;
    /// 최신순 원장
    async fn history(&self, host_id: &str) -> Result<Vec<CashHistoryEntry>, ApiError>;
}

// PostgreSQL 구현은 db/ 하위 모듈의 Database 구조체에 있음
// 테스트용 Mock 구현:

#[cfg(test)]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use crate::db::wallet::checked_deduction;

    pub struct MockQuoteRepository {
        quotes: RwLock<HashMap<Uuid, Quote>>,
    }

    impl MockQuoteRepository {
        pub fn new() -> Self {
            Self {
                quotes: RwLock::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl QuoteRepository for MockQuoteRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, ApiError> {
            let quotes = self.quotes.read().unwrap();
            Ok(quotes.get(&id).cloned())
        }

        async fn find_by_request(&self, request_id: Uuid) -> Result<Vec<Quote>, ApiError> {
            let quotes = self.quotes.read().unwrap();
            let mut matched: Vec<Quote> = quotes
                .values()
                .filter(|q| q.request_id == request_id)
                .cloned()
                .collect();
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(matched)
        }

        async fn save(&self, quote: &Quote) -> Result<(), ApiError> {
            let mut quotes = self.quotes.write().unwrap();
            quotes.insert(quote.id, quote.clone());
            Ok(())
        }

        async fn mark_read(&self, id: Uuid) -> Result<Quote, ApiError> {
            let mut quotes = self.quotes.write().unwrap();
            let quote = quotes
                .get_mut(&id)
                .ok_or_else(|| ApiError::NotFound("quote".to_string()))?;

            let current = QuoteStatus::parse(&quote.status)?;
            if current.can_transition_to(QuoteStatus::Read) {
                quote.status = QuoteStatus::Read.as_str().to_string();
                quote.updated_at = Utc::now();
            }
            Ok(quote.clone())
        }
    }

    pub struct MockPaymentRepository {
        payments: RwLock<HashMap<Uuid, Payment>>,
    }

    impl MockPaymentRepository {
        pub fn new() -> Self {
            Self {
                payments: RwLock::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentRepository for MockPaymentRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, ApiError> {
            let payments = self.payments.read().unwrap();
            Ok(payments.get(&id).cloned())
        }

        async fn save(&self, payment: &Payment) -> Result<(), ApiError> {
            let mut payments = self.payments.write().unwrap();
            payments.insert(payment.id, payment.clone());
            Ok(())
        }

        async fn transition(&self, id: Uuid, next: PaymentStatus) -> Result<Payment, ApiError> {
            let mut payments = self.payments.write().unwrap();
            let payment = payments
                .get_mut(&id)
                .ok_or_else(|| ApiError::NotFound("payment".to_string()))?;

            let from = PaymentStatus::parse(&payment.status)?;
            if !from.can_transition_to(next) {
                return Err(ApiError::InvalidTransition {
                    from: payment.status.clone(),
                    to: next.as_str().to_string(),
                });
            }

            payment.status = next.as_str().to_string();
            let now = Utc::now();
            match next {
                PaymentStatus::Completed => payment.paid_at = Some(now),
                PaymentStatus::Cancelled => payment.cancelled_at = Some(now),
                PaymentStatus::Refunded => payment.refunded_at = Some(now),
                PaymentStatus::Pending => {}
            }
            Ok(payment.clone())
        }
    }

    #[derive(Default)]
    struct MockWalletState {
        balance: i64,
        history: Vec<CashHistoryEntry>,
    }

    pub struct MockWalletRepository {
        wallets: RwLock<HashMap<String, MockWalletState>>,
    }

    impl MockWalletRepository {
        pub fn new() -> Self {
            Self {
                wallets: RwLock::new(HashMap::new()),
            }
        }

        fn entry(host_id: &str, entry_type: &str, amount: i64, balance: i64, seq: i64) -> CashHistoryEntry {
            CashHistoryEntry {
                id: seq,
                host_id: host_id.to_string(),
                entry_type: entry_type.to_string(),
                amount,
                balance,
                method: None,
                description: String::new(),
                created_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl WalletRepository for MockWalletRepository {
        async fn balance(&self, host_id: &str) -> Result<i64, ApiError> {
            let wallets = self.wallets.read().unwrap();
            Ok(wallets.get(host_id).map(|w| w.balance).unwrap_or(0))
        }

        async fn charge(&self, host_id: &str, amount: i64) -> Result<CashHistoryEntry, ApiError> {
            if amount <= 0 {
                return Err(ApiError::Validation("amount must be positive".to_string()));
            }
            let mut wallets = self.wallets.write().unwrap();
            let state = wallets.entry(host_id.to_string()).or_default();
            state.balance += amount;
            let seq = state.history.len() as i64 + 1;
            let entry = Self::entry(host_id, "charge", amount, state.balance, seq);
            state.history.push(entry.clone());
            Ok(entry)
        }

        async fn deduct(&self, host_id: &str, amount: i64) -> Result<CashHistoryEntry, ApiError> {
            let mut wallets = self.wallets.write().unwrap();
            let state = wallets.entry(host_id.to_string()).or_default();
            // 검증이 통과하기 전에는 잔액도 원장도 건드리지 않는다
            let next_balance = checked_deduction(state.balance, amount)?;
            state.balance = next_balance;
            let seq = state.history.len() as i64 + 1;
            let entry = Self::entry(host_id, "use", -amount, next_balance, seq);
            state.history.push(entry.clone());
            Ok(entry)
        }

        async fn history(&self, host_id: &str) -> Result<Vec<CashHistoryEntry>, ApiError> {
            let wallets = self.wallets.read().unwrap();
            let mut entries = wallets
                .get(host_id)
                .map(|w| w.history.clone())
                .unwrap_or_default();
            entries.reverse();
            Ok(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    use crate::db::models::HostProfile;
    use crate::services::fees;
    use crate::types::RequestStatus;

    fn sample_quote(request_id: Uuid, price: i64) -> Quote {
        let now = Utc::now();
        Quote {
            id: Uuid::new_v4(),
            request_id,
            guest_id: "guest-1".to_string(),
            host_id: "host-1".to_string(),
            host: Json(HostProfile {
                name: "김호스트".to_string(),
                contact: None,
                business_name: None,
            }),
            space_name: "강남 파티룸".to_string(),
            price,
            description: String::new(),
            items: Json(vec![]),
            estimated_duration: "4시간".to_string(),
            status: QuoteStatus::Unread.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_payment(quote: &Quote, method: &str) -> Payment {
        let now = Utc::now();
        Payment {
            id: Uuid::new_v4(),
            quote_id: quote.id,
            guest_id: quote.guest_id.clone(),
            host_id: quote.host_id.clone(),
            amount: quote.price,
            service_fee: fees::service_fee(quote.price),
            total_amount: fees::total_amount(quote.price),
            status: PaymentStatus::Pending.as_str().to_string(),
            payment_method: method.to_string(),
            created_at: now,
            paid_at: None,
            cancelled_at: None,
            refunded_at: None,
        }
    }

    /// create 직후 getById: 입력 + 계산된 기본값(상태, 수수료)만 달라야 한다
    #[tokio::test]
    async fn test_create_then_get_returns_computed_defaults() {
        let repo = MockPaymentRepository::new();
        let quote = sample_quote(Uuid::new_v4(), 150_000);
        let payment = sample_payment(&quote, "card");
        repo.save(&payment).await.unwrap();

        let found = repo.find_by_id(payment.id).await.unwrap().unwrap();
        assert_eq!(found.amount, 150_000);
        assert_eq!(found.service_fee, 7_500);
        assert_eq!(found.total_amount, 157_500);
        assert_eq!(found.status, "결제대기");
        assert!(found.paid_at.is_none());
    }

    /// 없는 id에 대한 전이는 실패하고 저장소는 변경되지 않는다
    #[tokio::test]
    async fn test_transition_on_missing_id_does_not_mutate() {
        let repo = MockPaymentRepository::new();
        let quote = sample_quote(Uuid::new_v4(), 50_000);
        let payment = sample_payment(&quote, "card");
        repo.save(&payment).await.unwrap();

        let err = repo
            .transition(Uuid::new_v4(), PaymentStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // 기존 결제는 그대로
        let found = repo.find_by_id(payment.id).await.unwrap().unwrap();
        assert_eq!(found.status, "결제대기");
    }

    /// 결제 완료 → 환불 시나리오: 타임스탬프가 전이별로 쌓이고 paid_at은 유지
    #[tokio::test]
    async fn test_payment_lifecycle_stamps() {
        let repo = MockPaymentRepository::new();
        let quote = sample_quote(Uuid::new_v4(), 150_000);
        let payment = sample_payment(&quote, "card");
        repo.save(&payment).await.unwrap();

        let completed = repo
            .transition(payment.id, PaymentStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.status, "결제완료");
        assert!(completed.paid_at.is_some());

        let refunded = repo
            .transition(payment.id, PaymentStatus::Refunded)
            .await
            .unwrap();
        assert_eq!(refunded.status, "결제환불");
        assert!(refunded.refunded_at.is_some());
        assert_eq!(refunded.paid_at, completed.paid_at);
    }

    /// 취소된 결제는 완료/환불로 전이할 수 없다
    #[tokio::test]
    async fn test_cancelled_payment_rejects_further_transitions() {
        let repo = MockPaymentRepository::new();
        let quote = sample_quote(Uuid::new_v4(), 80_000);
        let payment = sample_payment(&quote, "transfer");
        repo.save(&payment).await.unwrap();

        repo.transition(payment.id, PaymentStatus::Cancelled)
            .await
            .unwrap();
        let err = repo
            .transition(payment.id, PaymentStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition { .. }));
    }

    /// 요청 1건 + 견적 2건 → 하나만 열람: 목록에 열람/미열람이 정확히 하나씩
    #[tokio::test]
    async fn test_two_quotes_one_read_scenario() {
        let repo = MockQuoteRepository::new();
        let request_id = Uuid::new_v4();
        // 요청은 대기중 상태에서 출발
        assert_eq!(RequestStatus::Pending.as_str(), "대기중");

        let first = sample_quote(request_id, 100_000);
        let second = sample_quote(request_id, 120_000);
        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        repo.mark_read(first.id).await.unwrap();

        let quotes = repo.find_by_request(request_id).await.unwrap();
        assert_eq!(quotes.len(), 2);
        let read_count = quotes.iter().filter(|q| q.status == "열람").count();
        let unread_count = quotes.iter().filter(|q| q.status == "미열람").count();
        assert_eq!(read_count, 1);
        assert_eq!(unread_count, 1);
    }

    /// 열람 상태는 단조: 다시 mark_read 해도 미열람으로 돌아가지 않는다
    #[tokio::test]
    async fn test_quote_read_state_never_reverts() {
        let repo = MockQuoteRepository::new();
        let quote = sample_quote(Uuid::new_v4(), 100_000);
        repo.save(&quote).await.unwrap();

        let once = repo.mark_read(quote.id).await.unwrap();
        assert_eq!(once.status, "열람");
        let twice = repo.mark_read(quote.id).await.unwrap();
        assert_eq!(twice.status, "열람");
    }

    /// 지갑 불변식: 어떤 충전/차감 순서 뒤에도 잔액 == 최신 원장 항목의 balance
    #[tokio::test]
    async fn test_wallet_balance_matches_latest_history_entry() {
        let repo = MockWalletRepository::new();
        let host = "host-1";

        repo.charge(host, 10_000).await.unwrap();
        repo.deduct(host, 3_000).await.unwrap();
        repo.charge(host, 50_000).await.unwrap();
        repo.deduct(host, 7_000).await.unwrap();

        let balance = repo.balance(host).await.unwrap();
        assert_eq!(balance, 50_000);

        let history = repo.history(host).await.unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].balance, balance);
        // 원장 금액은 부호가 있고, 합계가 잔액과 일치
        let sum: i64 = history.iter().map(|e| e.amount).sum();
        assert_eq!(sum, balance);
    }

    /// 잔액 부족 차감은 지갑도 원장도 변경하지 않는다
    #[tokio::test]
    async fn test_insufficient_deduction_leaves_wallet_untouched() {
        let repo = MockWalletRepository::new();
        let host = "host-1";
        repo.charge(host, 3_000).await.unwrap();

        let err = repo.deduct(host, 5_000).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::InsufficientBalance {
                balance: 3_000,
                requested: 5_000
            }
        ));

        assert_eq!(repo.balance(host).await.unwrap(), 3_000);
        assert_eq!(repo.history(host).await.unwrap().len(), 1);
    }
}
