// Paths of the broker management REST API, relative to the base URL.

pub const CONNECTIONS: &str = "/api/connections";
pub const ACTIVE_CONNECTION: &str = "/api/connections/active";
pub const TEST_CONNECTION_CONFIG: &str = "/api/connections/test";
pub const BROKER_METRICS: &str = "/api/broker/metrics";
pub const QUEUES: &str = "/api/queues";

pub fn connection(id: &str) -> String {
    format!("{}/{}", CONNECTIONS, id)
}

pub fn connection_test(id: &str) -> String {
    format!("{}/{}/test", CONNECTIONS, id)
}

/// Collection of messages in a queue. `DELETE` on this path purges the queue.
pub fn queue_messages(queue_name: &str) -> String {
    format!("{}/{}/messages", QUEUES, queue_name)
}

pub fn queue_message(queue_name: &str, message_id: &str) -> String {
    format!("{}/{}/messages/{}", QUEUES, queue_name, message_id)
}
