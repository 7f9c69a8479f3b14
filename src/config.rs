//! Command-line and environment configuration.
//!
//! Every flag can also come from an environment variable, so the console can be
//! pointed at another backend without retyping arguments.

use std::time::Duration;

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Broker console - browse queues and messages through the broker management API
#[derive(Parser, Debug, Clone)]
#[command(name = "broker_console")]
#[command(version)]
pub struct Cli {
    /// Base URL of the broker management API
    #[arg(long, env = "BROKER_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Connection to use on startup (defaults to the backend's active connection)
    #[arg(long, env = "BROKER_CONNECTION_ID")]
    pub connection: Option<String>,

    /// Seconds a queue listing stays cached
    #[arg(long, env = "BROKER_QUEUES_TTL", default_value_t = 10)]
    pub queues_ttl: u64,

    /// Seconds a message listing stays cached
    #[arg(long, env = "BROKER_MESSAGES_TTL", default_value_t = 3)]
    pub messages_ttl: u64,

    /// Seconds between sweeps of expired cache entries
    #[arg(long, env = "BROKER_CACHE_SWEEP", default_value_t = 30)]
    pub sweep_interval: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "BROKER_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub queues_ttl: Duration,
    pub messages_ttl: Duration,
    pub sweep_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            queues_ttl: Duration::from_secs(10),
            messages_ttl: Duration::from_secs(3),
            sweep_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            base_url: cli.api_url.clone(),
            queues_ttl: Duration::from_secs(cli.queues_ttl),
            messages_ttl: Duration::from_secs(cli.messages_ttl),
            // A zero period would make tokio's interval panic.
            sweep_interval: Duration::from_secs(cli.sweep_interval.max(1)),
            request_timeout: Duration::from_secs(cli.request_timeout),
        }
    }
}
