pub mod cache;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod queue;

pub use cache::{ApiCache, ResponseCache, Sweep};
pub use connection::{
    BrokerConnection, ConnectionStatus, CreateConnectionRequest, TestConnectionRequest,
    TestConnectionResponse, UpdateConnectionRequest,
};
pub use message::{Message, RequeueOperation, SendMessageRequest};
pub use metrics::BrokerMetrics;
pub use queue::{QueueInfo, QueueLoad};
