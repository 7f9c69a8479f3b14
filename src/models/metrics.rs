// Broker health metrics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrokerMetrics {
    pub broker_id: String,
    pub broker_name: String,
    pub broker_version: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub max_memory: f64,
    pub memory_usage_percentage: f64,
    pub total_connections: u64,
    pub active_connections: u64,
    pub total_threads: u64,
    pub disk_usage: f64,
    pub max_disk_usage: f64,
    pub disk_usage_percentage: f64,
    pub start_time: String,
    pub uptime_millis: u64,
    pub uptime_formatted: String,
    pub status: String,
    pub timestamp: String,
}
