//! Application context
//!
//! Owns everything that lives for the whole session: the HTTP client, the shared
//! response cache with its sweeper, and the services built on top of them.

use std::sync::Arc;

use tracing::info;

use crate::api::BrokerApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::ApiCache;
use crate::services::{BrokerService, CacheSweeper, ConnectionService};

pub struct AppContext {
    pub config: Config,
    pub cache: Arc<ApiCache>,
    pub broker: BrokerService,
    pub connections: ConnectionService,
    sweeper: CacheSweeper,
}

impl AppContext {
    /// Builds the context and starts the cache sweeper. Must run inside a tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        let api = Arc::new(BrokerApiClient::new(&config.base_url, config.request_timeout)?);
        let cache = Arc::new(ApiCache::new());
        let sweeper = CacheSweeper::spawn(cache.clone(), config.sweep_interval);

        info!("Using broker API at {}", api.base_url());

        Ok(Self {
            broker: BrokerService::new(api.clone(), cache.clone(), &config),
            connections: ConnectionService::new(api),
            cache,
            config,
            sweeper,
        })
    }

    pub async fn shutdown(self) {
        self.sweeper.shutdown().await;
        info!("Shutting down");
    }
}
