//! NetLedger API server.
//!
//! Main entry point for the NetLedger ledger service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netledger_api::{AppState, create_router};
use netledger_core::ledger::{ApiKeyRegistry, LedgerEngine};
use netledger_db::{AccountRepository, ApiKeyRepository, EntryRepository, connect};
use netledger_shared::{AppConfig, Clock, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().expect("failed to load configuration");

    let db = connect(&config.database.url).await?;
    info!("connected to database");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let accounts = Arc::new(AccountRepository::new(db.clone()));
    let entries = Arc::new(EntryRepository::new(db.clone()));
    let api_keys_repo = Arc::new(ApiKeyRepository::new(db));

    let engine = Arc::new(LedgerEngine::new(accounts, entries, clock.clone()));
    let api_keys = Arc::new(ApiKeyRegistry::new(api_keys_repo, clock));

    bootstrap_admin_key(&api_keys, &config).await?;

    let state = AppState { engine, api_keys };
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seeds a single admin API key from configuration when the registry is
/// empty. The plaintext can't be recovered once generated, so an operator
/// supplies it up front instead of it being generated and lost silently.
async fn bootstrap_admin_key(api_keys: &ApiKeyRegistry, config: &AppConfig) -> anyhow::Result<()> {
    let Some(plaintext) = config.api_keys.bootstrap_admin_key.clone() else {
        return Ok(());
    };

    if !api_keys.list().await?.is_empty() {
        return Ok(());
    }

    let key = api_keys
        .create_with_plaintext("bootstrap-admin".to_string(), &plaintext, true)
        .await?;
    info!(key_guid = %key.guid, "seeded bootstrap admin api key from configuration");
    Ok(())
}
