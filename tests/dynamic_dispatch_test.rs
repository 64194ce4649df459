mod common;

use nalogo_receipts::application::receipts::{NewIncome, ReceiptService};
use nalogo_receipts::domain::ports::IncomeApiBox;
use nalogo_receipts::infrastructure::in_memory::InMemoryIncomeApi;
use std::sync::Arc;

#[tokio::test]
async fn test_service_over_trait_object() {
    let api = InMemoryIncomeApi::new();
    let boxed: IncomeApiBox = Box::new(api.clone());
    let service = Arc::new(ReceiptService::new(
        boxed,
        Some(common::INN),
        Some(common::PASSWORD),
    ));

    // Verify Send + Sync by spawning tasks
    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move {
            service
                .create_income_receipt(NewIncome::new("Consulting", 100.0))
                .await
        }
    });
    let second = tokio::spawn({
        let service = Arc::clone(&service);
        async move {
            service
                .create_income_receipt(NewIncome::new("Code review", 45.5).quantity(2.0))
                .await
        }
    });

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert_ne!(first, second);

    let posted = api.posted_requests().await;
    assert_eq!(posted.len(), 2);
    let mut totals: Vec<_> = posted
        .iter()
        .map(|request| request.body["total_amount"].as_str().unwrap().to_string())
        .collect();
    totals.sort();
    assert_eq!(totals, vec!["100", "91.0"]);
}
