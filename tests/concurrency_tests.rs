mod common;

use common::*;
use std::sync::Arc;
use tillpay::domain::outcome::{IgnoreReason, Outcome};
use tillpay::domain::ports::{LedgerStore, SubscriptionStore};

#[tokio::test]
async fn concurrent_duplicate_deliveries_credit_exactly_once() {
    let (engine, ledger) = engine_fixture();
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .accept_payment(confirmation("4321", "3000", "QK12XY99"))
                .await
                .unwrap()
        }));
    }

    let mut accepted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Outcome::Accepted { persisted: true } => accepted += 1,
            Outcome::Ignored(IgnoreReason::DuplicateTransaction) => duplicates += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(ledger.payment_logs().await.unwrap().len(), 1);
    assert_eq!(ledger.payments().await.unwrap().len(), 2);
    assert_eq!(ledger.external_transactions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn racing_payments_for_one_account_serialize_cleanly() {
    let (engine, ledger) = engine_fixture();
    let engine = Arc::new(engine);

    // An organization-level and an individual-level payment both crediting
    // sub-account 1111, delivered concurrently under distinct ids.
    let org_engine = Arc::clone(&engine);
    let org_task = tokio::spawn(async move {
        org_engine
            .accept_payment(confirmation("4321", "3000", "QK12XY01"))
            .await
            .unwrap()
    });
    let single_engine = Arc::clone(&engine);
    let single_task = tokio::spawn(async move {
        single_engine
            .accept_payment(confirmation("1111", "7500", "QK12XY02"))
            .await
            .unwrap()
    });

    assert!(org_task.await.unwrap().accepted());
    assert!(single_task.await.unwrap().accepted());

    // Both committed; the final window reflects whichever commit came second,
    // consistent with its own paid_at, not a torn mix of the two.
    assert_eq!(ledger.payment_logs().await.unwrap().len(), 2);
    let subscription = ledger.subscription(SUB_A).await.unwrap().unwrap();
    let paid_at = subscription.last_payment_date.unwrap();
    let months = (subscription.due_date - paid_at).num_days();
    assert!(
        subscription.due_date == paid_at + chrono::Months::new(1)
            || subscription.due_date == paid_at + chrono::Months::new(6),
        "window of {months} days matches neither payment"
    );
}
