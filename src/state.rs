use std::sync::Arc;

use crate::clients::feed::FeedClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{SeaOrmTransactionService, SeedService, TransactionService};

/// Build a shared HTTP client with reasonable defaults for outbound calls.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("salesboard/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Everything a request handler or CLI command needs, constructed once at
/// startup and passed down explicitly.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub transaction_service: Arc<dyn TransactionService>,

    pub seed_service: Arc<SeedService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires the default services around an existing store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let transaction_service: Arc<dyn TransactionService> = Arc::new(
            SeaOrmTransactionService::new(store.clone(), config.window.years()),
        );

        Self::with_transaction_service(config, store, transaction_service)
    }

    /// Same as [`SharedState::with_store`] but with a caller-supplied query
    /// service, e.g. a test double.
    pub fn with_transaction_service(
        config: Config,
        store: Store,
        transaction_service: Arc<dyn TransactionService>,
    ) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.seed.request_timeout_seconds)?;
        let feed = Arc::new(FeedClient::with_shared_client(
            http_client,
            config.seed.feed_url.clone(),
        ));
        let seed_service = Arc::new(SeedService::new(store.clone(), feed, config.seed.mode));

        Ok(Self {
            config: Arc::new(config),
            store,
            transaction_service,
            seed_service,
        })
    }
}
