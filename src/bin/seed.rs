//! Seed Tool
//!
//! 데모/개발용 픽스처 데이터 생성기.
//!
//! 픽스처 생성은 요청 처리 경로에서 완전히 분리된 별도 바이너리다.
//! 서버는 데이터가 비어 있어도 스스로 레코드를 만들어내지 않는다.
//!
//! ```text
//! DATABASE_URL=postgres://... cargo run --bin seed
//! ```

use rand::Rng;
use uuid::Uuid;

use space_rental_api::db::{HostProfile, NewQuote, NewRequest, QuoteItem};
use space_rental_api::services::notifier;
use space_rental_api::{Config, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let db = Database::connect(&config.database_url).await?;
    db.run_migrations().await?;

    tracing::info!("🌱 Seeding fixture data");

    let guest_id = "seed-guest-1";
    let hosts = [
        ("seed-host-1", "김민수", "강남 루프탑 스튜디오"),
        ("seed-host-2", "이서연", "홍대 파티룸 블룸"),
        ("seed-host-3", "박지훈", "성수 공유 주방"),
    ];

    let mut rng = rand::thread_rng();

    // 게스트 요청 1건
    let request = db
        .create_request(
            guest_id,
            &NewRequest {
                original_query: "20명 규모 워크샵 공간을 찾고 있어요".to_string(),
                space_type: "스튜디오".to_string(),
                purpose: "워크샵".to_string(),
                capacity: 20,
                equipment: vec!["빔프로젝터".to_string(), "화이트보드".to_string()],
                catering: true,
                parking: false,
                additional_request: Some("오전 세팅 시간이 필요합니다".to_string()),
                date: None,
                location: "서울 강남구".to_string(),
                time: "13:00-18:00".to_string(),
                category: "모임".to_string(),
            },
        )
        .await?;
    tracing::info!(request_id = %request.id, "request created");

    // 호스트별 견적서
    for (host_id, host_name, space_name) in hosts {
        let price = rng.gen_range(8..=20) * 10_000;
        let quote_id = Uuid::new_v4();
        let new_quote = NewQuote {
            request_id: request.id,
            host: HostProfile {
                name: host_name.to_string(),
                contact: Some("010-0000-0000".to_string()),
                business_name: Some(space_name.to_string()),
            },
            space_name: space_name.to_string(),
            price,
            description: "요청 조건에 맞춰 준비해 드리겠습니다.".to_string(),
            items: vec![
                QuoteItem {
                    name: "대관료".to_string(),
                    price,
                },
                QuoteItem {
                    name: "기본 장비".to_string(),
                    price: 0,
                },
            ],
            estimated_duration: "5시간".to_string(),
        };
        let notify = notifier::quote_received(guest_id, space_name, quote_id);

        let quote = db
            .create_quote(quote_id, host_id, guest_id, &new_quote, &notify)
            .await?;
        tracing::info!(quote_id = %quote.id, host = host_id, price, "quote created");

        // 호스트 지갑 충전
        let charge = rng.gen_range(3..=10) * 10_000;
        let charge_notify = notifier::cash_charged(host_id, charge);
        db.charge_cash(host_id, charge, Some("card"), "캐시 충전", &charge_notify)
            .await?;
        tracing::info!(host = host_id, charge, "wallet charged");
    }

    tracing::info!("✅ Seed complete");
    Ok(())
}
