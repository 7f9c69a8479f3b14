use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, error, info, warn};

use crate::api::{endpoints, BrokerApiClient};
use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::models::cache::{messages_key, queues_key, ApiCache};
use crate::models::queue::QueuesPayload;
use crate::models::{BrokerMetrics, Message, QueueInfo, RequeueOperation, SendMessageRequest};

/// Result of probing a connection through the metrics endpoint.
#[derive(Debug, Clone)]
pub struct Connectivity {
    pub connected: bool,
    pub error: Option<String>,
    pub checked_at: SystemTime,
}

/// Queue, message and metrics operations scoped to a broker connection.
///
/// Reads go through the shared [`ApiCache`]; every successful mutation drops the
/// cache keys it made stale. A failed mutation leaves the cache as it was.
pub struct BrokerService {
    api: Arc<BrokerApiClient>,
    cache: Arc<ApiCache>,
    queues_ttl: Duration,
    messages_ttl: Duration,
}

impl BrokerService {
    pub fn new(api: Arc<BrokerApiClient>, cache: Arc<ApiCache>, config: &Config) -> Self {
        Self {
            api,
            cache,
            queues_ttl: config.queues_ttl,
            messages_ttl: config.messages_ttl,
        }
    }

    pub fn cache(&self) -> &ApiCache {
        &self.cache
    }

    pub async fn fetch_queues(&self, connection_id: &str) -> Result<Vec<QueueInfo>> {
        self.cache
            .queues
            .cached_fetch(
                &queues_key(connection_id),
                move || async move {
                    let response = self.api.get(endpoints::QUEUES, Some(connection_id)).await?;
                    let payload: QueuesPayload = response.json().await?;
                    Ok::<_, ConsoleError>(Vec::<QueueInfo>::from(payload))
                },
                self.queues_ttl,
            )
            .await
            .inspect_err(|e| error!("Failed to fetch queues for connection {}: {}", connection_id, e))
    }

    pub async fn fetch_messages(&self, queue_name: &str, connection_id: &str) -> Result<Vec<Message>> {
        self.cache
            .messages
            .cached_fetch(
                &messages_key(queue_name, connection_id),
                move || async move {
                    let path = endpoints::queue_messages(queue_name);
                    let response = self.api.get(&path, Some(connection_id)).await?;
                    let messages: Vec<Message> = response.json().await?;
                    debug!("Retrieved {} messages from {}", messages.len(), queue_name);
                    Ok::<_, ConsoleError>(messages)
                },
                self.messages_ttl,
            )
            .await
            .inspect_err(|e| error!("Failed to fetch messages of {}: {}", queue_name, e))
    }

    /// Publishes a message and returns the backend's confirmation text.
    pub async fn send_message(
        &self,
        queue_name: &str,
        request: &SendMessageRequest,
        connection_id: &str,
    ) -> Result<String> {
        let path = endpoints::queue_messages(queue_name);
        let response = self.api.post_json(&path, Some(connection_id), request).await?;
        let confirmation = response.text().await?;

        info!("Message sent to {}: {}", queue_name, confirmation);
        self.cache.messages.delete(&messages_key(queue_name, connection_id));
        Ok(confirmation)
    }

    pub async fn delete_message(&self, queue_name: &str, message_id: &str, connection_id: &str) -> Result<()> {
        let path = endpoints::queue_message(queue_name, message_id);
        self.api.delete(&path, Some(connection_id)).await?;

        info!("Deleted message {} from {}", message_id, queue_name);
        self.cache.messages.delete(&messages_key(queue_name, connection_id));
        Ok(())
    }

    /// Removes every message from a queue.
    pub async fn purge_queue(&self, queue_name: &str, connection_id: &str) -> Result<()> {
        let path = endpoints::queue_messages(queue_name);
        self.api.delete(&path, Some(connection_id)).await?;

        info!("Purged queue {}", queue_name);
        self.cache.messages.delete(&messages_key(queue_name, connection_id));
        // Queue sizes in the listing changed too.
        self.cache.queues.delete(&queues_key(connection_id));
        Ok(())
    }

    /// Copies (or moves, for [`RequeueOperation::Cut`]) messages between queues.
    ///
    /// Returns the number of messages sent to `target`. With `Cut`, a message that
    /// fails to delete from `source` is logged and the rest are still processed.
    pub async fn requeue_messages(
        &self,
        source: &str,
        target: &str,
        message_ids: &[String],
        operation: RequeueOperation,
        connection_id: &str,
    ) -> Result<usize> {
        let messages = self.fetch_messages(source, connection_id).await?;
        let selected: Vec<Message> = messages
            .into_iter()
            .filter(|message| message_ids.contains(&message.id))
            .collect();

        if selected.is_empty() {
            return Err(ConsoleError::NothingToRequeue(source.to_string()));
        }

        debug!(
            "Requeueing {} messages from {} to {} ({:?})",
            selected.len(),
            source,
            target,
            operation
        );

        for message in &selected {
            self.send_message(target, &SendMessageRequest::requeued(&message.body), connection_id)
                .await?;
        }

        if operation == RequeueOperation::Cut {
            for message_id in message_ids {
                if let Err(e) = self.delete_message(source, message_id, connection_id).await {
                    warn!("Could not remove {} from {}: {}", message_id, source, e);
                }
            }
        }

        info!("Requeued {} messages from {} to {}", selected.len(), source, target);
        Ok(selected.len())
    }

    pub async fn fetch_metrics(&self, connection_id: &str) -> Result<BrokerMetrics> {
        let response = self.api.get(endpoints::BROKER_METRICS, Some(connection_id)).await?;
        Ok(response.json().await?)
    }

    /// Probes the broker by asking for its metrics.
    pub async fn check_connectivity(&self, connection_id: Option<&str>) -> Connectivity {
        let Some(connection_id) = connection_id else {
            return Connectivity {
                connected: false,
                error: Some("No active connection".to_string()),
                checked_at: SystemTime::now(),
            };
        };

        match self.fetch_metrics(connection_id).await {
            Ok(_) => Connectivity {
                connected: true,
                error: None,
                checked_at: SystemTime::now(),
            },
            Err(e) => {
                warn!("Connectivity check failed for {}: {}", connection_id, e);
                Connectivity {
                    connected: false,
                    error: Some(e.to_string()),
                    checked_at: SystemTime::now(),
                }
            }
        }
    }
}
