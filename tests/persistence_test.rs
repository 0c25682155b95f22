#![cfg(feature = "storage-rocksdb")]

mod common;

use common::*;
use tempfile::tempdir;
use tillpay::application::engine::PaymentEngine;
use tillpay::domain::account::{OrganizationAccount, SubAccount};
use tillpay::domain::outcome::{IgnoreReason, Outcome};
use tillpay::domain::ports::{LedgerStore, SubscriptionStore};
use tillpay::infrastructure::in_memory::InMemoryDirectory;
use tillpay::infrastructure::pricing::TierPricing;
use tillpay::infrastructure::rocksdb::RocksDbLedger;

fn engine_on(ledger: RocksDbLedger) -> PaymentEngine {
    let directory = InMemoryDirectory::new();
    directory.insert_organization(OrganizationAccount {
        reg_no: ORG_REF,
        owner_email: "owner@example.com".to_string(),
    });
    directory.insert_sub_account(SubAccount {
        reg_no: SUB_A,
        organization: ORG_REF,
    });
    directory.insert_sub_account(SubAccount {
        reg_no: SUB_B,
        organization: ORG_REF,
    });
    PaymentEngine::new(
        Box::new(directory),
        Box::new(TierPricing::default()),
        Box::new(ledger),
    )
}

#[tokio::test]
async fn test_dedupe_survives_restart() {
    let dir = tempdir().unwrap();

    {
        let ledger = RocksDbLedger::open(dir.path()).unwrap();
        let engine = engine_on(ledger.clone());
        let outcome = engine
            .accept_payment(confirmation("4321", "3000", "QK12XY99"))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Accepted { persisted: true });
    }

    // Reopen the ledger: the gateway retries the same transaction.
    let ledger = RocksDbLedger::open(dir.path()).unwrap();
    let engine = engine_on(ledger.clone());
    let outcome = engine
        .accept_payment(confirmation("4321", "3000", "QK12XY99"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::DuplicateTransaction));

    assert_eq!(ledger.payment_logs().await.unwrap().len(), 1);
    assert_eq!(ledger.payments().await.unwrap().len(), 2);
    assert_eq!(ledger.external_transactions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_subscriptions_persist_across_reopen() {
    let dir = tempdir().unwrap();

    {
        let ledger = RocksDbLedger::open(dir.path()).unwrap();
        let engine = engine_on(ledger);
        engine
            .accept_payment(manual("1111", "12000"))
            .await
            .unwrap();
    }

    let ledger = RocksDbLedger::open(dir.path()).unwrap();
    let subscription = ledger.subscription(SUB_A).await.unwrap().unwrap();
    assert_eq!(
        subscription.due_date,
        subscription.last_payment_date.unwrap() + chrono::Months::new(12)
    );
    assert!(ledger.subscription(SUB_B).await.unwrap().is_none());
}
