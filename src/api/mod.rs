// Broker management REST API access.

pub mod client;
pub mod endpoints;

pub use client::BrokerApiClient;
