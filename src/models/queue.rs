// Queue listing types returned by the broker API.

use serde::{Deserialize, Serialize};

/// Queues holding more than this many messages are under high load.
pub const HIGH_LOAD_THRESHOLD: u64 = 100;
/// Queues holding more than this many messages are under medium load.
pub const MEDIUM_LOAD_THRESHOLD: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGroupInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueInfo {
    pub name: String,
    #[serde(default)]
    pub queue_size: u64,
    #[serde(default)]
    pub enqueue_count: u64,
    #[serde(default)]
    pub dequeue_count: u64,
    #[serde(default)]
    pub consumer_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_groups: Option<Vec<MessageGroupInfo>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueLoad {
    Empty,
    Normal,
    Medium,
    High,
}

impl QueueInfo {
    pub fn load(&self) -> QueueLoad {
        match self.queue_size {
            0 => QueueLoad::Empty,
            n if n > HIGH_LOAD_THRESHOLD => QueueLoad::High,
            n if n > MEDIUM_LOAD_THRESHOLD => QueueLoad::Medium,
            _ => QueueLoad::Normal,
        }
    }

    pub fn has_consumers(&self) -> bool {
        self.consumer_count > 0
    }
}

impl QueueLoad {
    pub fn label(&self) -> &'static str {
        match self {
            QueueLoad::Empty => "Empty",
            QueueLoad::Normal => "Normal",
            QueueLoad::Medium => "Medium",
            QueueLoad::High => "High",
        }
    }
}

/// The backend answers either with a bare array or with `{"queues": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum QueuesPayload {
    List(Vec<QueueInfo>),
    Wrapped {
        #[serde(default)]
        queues: Vec<QueueInfo>,
    },
}

impl From<QueuesPayload> for Vec<QueueInfo> {
    fn from(payload: QueuesPayload) -> Self {
        match payload {
            QueuesPayload::List(queues) | QueuesPayload::Wrapped { queues } => queues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn queue(size: u64) -> QueueInfo {
        QueueInfo {
            name: "orders".to_string(),
            queue_size: size,
            enqueue_count: 0,
            dequeue_count: 0,
            consumer_count: 0,
            message_groups: None,
        }
    }

    #[test]
    fn test_load_thresholds() {
        assert_eq!(queue(0).load(), QueueLoad::Empty);
        assert_eq!(queue(10).load(), QueueLoad::Normal);
        assert_eq!(queue(11).load(), QueueLoad::Medium);
        assert_eq!(queue(100).load(), QueueLoad::Medium);
        assert_eq!(queue(101).load(), QueueLoad::High);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let info: QueueInfo = serde_json::from_value(json!({
            "name": "orders",
            "queueSize": 4,
            "enqueueCount": 10,
            "dequeueCount": 6,
            "consumerCount": 1
        }))
        .unwrap();

        assert_eq!(info.queue_size, 4);
        assert!(info.has_consumers());
        assert!(info.message_groups.is_none());
    }

    #[test]
    fn test_queues_payload_shapes() {
        let bare: QueuesPayload = serde_json::from_value(json!([{"name": "a"}])).unwrap();
        let wrapped: QueuesPayload =
            serde_json::from_value(json!({"queues": [{"name": "a"}, {"name": "b"}]})).unwrap();
        let empty: QueuesPayload = serde_json::from_value(json!({})).unwrap();

        assert_eq!(Vec::<QueueInfo>::from(bare).len(), 1);
        assert_eq!(Vec::<QueueInfo>::from(wrapped).len(), 2);
        assert!(Vec::<QueueInfo>::from(empty).is_empty());
    }
}
