mod common;

use nalogo_receipts::application::receipts::NewIncome;
use nalogo_receipts::domain::credentials::Credentials;
use nalogo_receipts::infrastructure::in_memory::InMemoryIncomeApi;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

const CALLERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_handshake() {
    let api = InMemoryIncomeApi::new().with_token_delay(Duration::from_millis(50));
    let service = Arc::new(common::configured_service(&api));

    let mut tasks = JoinSet::new();
    for i in 0..CALLERS {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            service
                .create_income_receipt(NewIncome::new(format!("Lesson {i}"), 1500.0))
                .await
        });
    }

    let mut receipts = Vec::new();
    while let Some(result) = tasks.join_next().await {
        receipts.push(result.unwrap());
    }

    assert_eq!(receipts.len(), CALLERS);
    assert!(receipts.iter().all(Option::is_some));
    assert_eq!(api.token_requests().await, 1);
    assert_eq!(api.authentications().await, 1);
    assert_eq!(api.posted_requests().await.len(), CALLERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_after_failed_handshake() {
    let accepted = Credentials::new(Some(common::INN), Some("another password")).unwrap();
    let api = InMemoryIncomeApi::new()
        .accepting(accepted)
        .with_token_delay(Duration::from_millis(10));
    let service = Arc::new(common::configured_service(&api));

    let mut tasks = JoinSet::new();
    for _ in 0..CALLERS {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            service
                .create_income_receipt(NewIncome::new("Consulting", 100.0))
                .await
        });
    }

    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap(), None);
    }

    // Handshakes never overlap, so each caller retries in turn.
    assert_eq!(api.token_requests().await, CALLERS);
    assert_eq!(api.authentications().await, 0);
    assert!(api.posted_requests().await.is_empty());
}
