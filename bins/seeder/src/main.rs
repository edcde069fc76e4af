//! Development-data seeder for NetLedger.
//!
//! Creates a couple of demo accounts, posts entries through both the
//! already-committed shortcut and the pending-then-commit path, and
//! provisions a demo API key. Useful for exercising a fresh database
//! without writing the ledger by hand.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use rust_decimal::Decimal;

use netledger_core::ledger::{ApiKeyRegistry, LedgerEngine};
use netledger_db::{AccountRepository, ApiKeyRepository, EntryRepository, connect};
use netledger_shared::SystemClock;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = connect(&database_url).await.expect("failed to connect to database");

    let clock = Arc::new(SystemClock);
    let accounts = Arc::new(AccountRepository::new(db.clone()));
    let entries = Arc::new(EntryRepository::new(db.clone()));
    let api_keys_repo = Arc::new(ApiKeyRepository::new(db));

    let engine = LedgerEngine::new(accounts, entries, clock.clone());
    let api_keys = ApiKeyRegistry::new(api_keys_repo, clock);

    seed_checking_account(&engine).await;
    seed_savings_account(&engine).await;
    seed_demo_api_key(&api_keys).await;

    println!("Seeding complete!");
}

/// A checking account with two entries posted straight through
/// (`already_committed = true`) and one still-pending credit.
async fn seed_checking_account(engine: &LedgerEngine) {
    println!("Seeding checking account...");
    let account = match engine
        .create_account("Demo Checking".to_string(), Some("seeded for local dev".to_string()))
        .await
    {
        Ok(account) => account,
        Err(err) => {
            println!("  skipping, already exists ({err})");
            return;
        }
    };

    engine
        .add_credit(account.guid, Decimal::new(250_00, 2), Some("opening deposit".to_string()), true)
        .await
        .expect("seed opening deposit");
    engine
        .add_debit(account.guid, Decimal::new(42_50, 2), Some("card purchase".to_string()), true)
        .await
        .expect("seed card purchase");
    engine
        .add_credit(account.guid, Decimal::new(10_00, 2), Some("pending refund".to_string()), false)
        .await
        .expect("seed pending refund");

    let balance = engine.get_balance(account.guid).await.unwrap();
    println!("  created {} with committed balance {}", account.guid, balance.committed_balance);
}

/// A savings account seeded with several pending entries, then committed in
/// one batch — exercises the multi-entry commit path.
async fn seed_savings_account(engine: &LedgerEngine) {
    println!("Seeding savings account...");
    let account = match engine.create_account("Demo Savings".to_string(), None).await {
        Ok(account) => account,
        Err(err) => {
            println!("  skipping, already exists ({err})");
            return;
        }
    };

    engine
        .add_credits(
            account.guid,
            vec![
                (Decimal::new(1_000_00, 2), Some("initial transfer".to_string())),
                (Decimal::new(50_00, 2), Some("interest".to_string())),
            ],
            false,
        )
        .await
        .expect("seed savings credits");

    let balance = engine.commit(account.guid, None).await.expect("commit savings entries");
    println!("  created {} with committed balance {}", account.guid, balance.committed_balance);
}

/// A non-admin key for local API testing. Printed once since the registry
/// never stores or returns plaintext again.
async fn seed_demo_api_key(api_keys: &ApiKeyRegistry) {
    println!("Seeding demo api key...");
    match api_keys.create("local-dev".to_string(), false).await {
        Ok((key, plaintext)) => println!("  created api key {} — plaintext: {plaintext}", key.guid),
        Err(err) => println!("  skipping ({err})"),
    }
}
