pub mod api;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use config::{Cli, Config};
pub use context::AppContext;
pub use error::{ConsoleError, Result};
pub use models::cache::{ApiCache, ResponseCache};
pub use services::{BrokerService, ConnectionService};
