use tillpay::application::engine::PaymentEngine;
use tillpay::domain::account::{OrganizationAccount, SubAccount};
use tillpay::domain::payment::{GatewayDetails, PaymentRequest, RequestType};
use tillpay::infrastructure::in_memory::{InMemoryDirectory, InMemoryLedger};
use tillpay::infrastructure::pricing::TierPricing;

pub const ORG_REF: u64 = 4321;
pub const SUB_A: u64 = 1111;
pub const SUB_B: u64 = 2222;

/// Engine wired against a seeded in-memory directory (one organization with
/// two sub-accounts) and the default rate table. Returns a ledger handle
/// sharing state with the engine so tests can observe committed rows.
pub fn engine_fixture() -> (PaymentEngine, InMemoryLedger) {
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

    let ledger = InMemoryLedger::new();
    let engine = PaymentEngine::new(
        Box::new(directory),
        Box::new(TierPricing::default()),
        Box::new(ledger.clone()),
    );
    (engine, ledger)
}

pub fn gateway_request(
    request_type: RequestType,
    reference: &str,
    amount: &str,
    trans_id: &str,
) -> PaymentRequest {
    PaymentRequest {
        payment_method: "mobile_money".to_string(),
        request_type,
        account_ref: reference.to_string(),
        amount: amount.to_string(),
        payer_email: None,
        gateway: Some(GatewayDetails {
            transaction_id: trans_id.to_string(),
            payload: format!(r#"{{"TransID":"{trans_id}","TransAmount":"{amount}"}}"#),
        }),
    }
}

pub fn confirmation(reference: &str, amount: &str, trans_id: &str) -> PaymentRequest {
    gateway_request(RequestType::Confirmation, reference, amount, trans_id)
}

pub fn validation(reference: &str, amount: &str, trans_id: &str) -> PaymentRequest {
    gateway_request(RequestType::Validation, reference, amount, trans_id)
}

pub fn manual(reference: &str, amount: &str) -> PaymentRequest {
    PaymentRequest {
        payment_method: "manual".to_string(),
        request_type: RequestType::Confirmation,
        account_ref: reference.to_string(),
        amount: amount.to_string(),
        payer_email: Some("admin@example.com".to_string()),
        gateway: None,
    }
}
