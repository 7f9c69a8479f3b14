pub mod broker_service;
pub mod connection_service;
pub mod sweeper;

pub use broker_service::{BrokerService, Connectivity};
pub use connection_service::ConnectionService;
pub use sweeper::CacheSweeper;
