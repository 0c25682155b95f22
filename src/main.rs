use clap::Parser;
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use tillpay::application::engine::PaymentEngine;
use tillpay::domain::account::{OrganizationAccount, SubAccount};
use tillpay::domain::outcome::Outcome;
use tillpay::domain::ports::{DirectoryBox, LedgerBox, OracleBox};
use tillpay::infrastructure::in_memory::{InMemoryDirectory, InMemoryLedger};
use tillpay::infrastructure::pricing::TierPricing;
#[cfg(feature = "storage-rocksdb")]
use tillpay::infrastructure::rocksdb::RocksDbLedger;
use tillpay::interfaces::json::callback_reader::CallbackReader;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Inbound events file, one JSON event per line
    events: PathBuf,

    /// Account directory seed file (JSON)
    #[arg(long)]
    accounts: PathBuf,

    /// Pricing rate table (JSON). Defaults to the built-in table.
    #[arg(long)]
    pricing: Option<PathBuf>,

    /// Path to a persistent ledger (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

/// Directory seed shape: the organizations and sub-accounts the surrounding
/// account-management system would normally own.
#[derive(Deserialize)]
struct DirectorySeed {
    organizations: Vec<OrganizationAccount>,
    sub_accounts: Vec<SubAccount>,
}

fn load_directory(path: &PathBuf) -> Result<InMemoryDirectory> {
    let file = File::open(path).into_diagnostic()?;
    let seed: DirectorySeed = serde_json::from_reader(file).into_diagnostic()?;

    let directory = InMemoryDirectory::new();
    for organization in seed.organizations {
        directory.insert_organization(organization);
    }
    for sub_account in seed.sub_accounts {
        directory.insert_sub_account(sub_account);
    }
    Ok(directory)
}

fn load_pricing(path: Option<&PathBuf>) -> Result<TierPricing> {
    match path {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            serde_json::from_reader(file).into_diagnostic()
        }
        None => Ok(TierPricing::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let directory: DirectoryBox = Box::new(load_directory(&cli.accounts)?);
    let oracle: OracleBox = Box::new(load_pricing(cli.pricing.as_ref())?);

    #[cfg(feature = "storage-rocksdb")]
    let ledger: LedgerBox = match cli.db_path {
        Some(db_path) => Box::new(RocksDbLedger::open(db_path).into_diagnostic()?),
        None => Box::new(InMemoryLedger::new()),
    };
    #[cfg(not(feature = "storage-rocksdb"))]
    let ledger: LedgerBox = Box::new(InMemoryLedger::new());

    let engine = PaymentEngine::new(directory, oracle, ledger);

    let file = File::open(&cli.events).into_diagnostic()?;
    let reader = CallbackReader::new(file);

    for (line_no, event) in reader.events().enumerate() {
        let line_no = line_no + 1;
        let request = match event.and_then(|event| event.into_request()) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("event {line_no}: unreadable ({e})");
                continue;
            }
        };

        match engine.accept_payment(request).await {
            Ok(Outcome::Accepted { persisted: true }) => println!("event {line_no}: accepted"),
            Ok(Outcome::Accepted { persisted: false }) => println!("event {line_no}: validated"),
            Ok(Outcome::Rejected(rejection)) => {
                println!("event {line_no}: rejected: {}", rejection.message());
            }
            Ok(Outcome::Ignored(reason)) => println!("event {line_no}: ignored ({reason:?})"),
            Err(e) => eprintln!("event {line_no}: engine failure: {e}"),
        }
    }

    Ok(())
}
