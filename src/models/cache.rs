// In-memory response cache with per-entry TTL.
// Sits between the services and the broker API; keys are opaque strings built by callers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::models::message::Message;
use crate::models::queue::QueueInfo;

#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub data: V,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// An entry stays readable while `now - stored_at <= ttl`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }
}

/// Key-value store holding the latest successful response per key.
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, key: &str, data: V, ttl: Duration) {
        self.entries().insert(
            key.to_string(),
            CacheEntry {
                data,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Returns the stored value if still fresh; an expired entry is removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries();
        let expired = entries.get(key)?.is_expired(Instant::now());
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.data.clone())
    }

    pub fn has(&self, key: &str) -> bool {
        let mut entries = self.entries();
        match entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired(Instant::now()) => {
                entries.remove(key);
                false
            }
            Some(_) => true,
        }
    }

    pub fn delete(&self, key: &str) {
        self.entries().remove(key);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including ones that expired but were not yet purged.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached value for `key`, or runs `producer` and caches its result.
    ///
    /// Failures are passed through untouched and never cached. Concurrent misses on
    /// the same key each run their own producer; there is no in-flight coalescing.
    pub async fn cached_fetch<F, Fut, E>(&self, key: &str, producer: F, ttl: Duration) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        debug!("Cache miss for {} - fetching", key);
        let data = producer().await?;
        self.set(key, data.clone(), ttl);
        Ok(data)
    }
}

/// Anything the background sweeper can purge.
pub trait Sweep: Send + Sync {
    fn sweep(&self) -> usize;
}

impl<V: Clone + Send> Sweep for ResponseCache<V> {
    fn sweep(&self) -> usize {
        self.cleanup()
    }
}

pub fn queues_key(connection_id: &str) -> String {
    format!("queues-{}", connection_id)
}

pub fn messages_key(queue_name: &str, connection_id: &str) -> String {
    format!("messages-{}-{}", queue_name, connection_id)
}

/// The process-wide cache, one typed store per key namespace.
#[derive(Default)]
pub struct ApiCache {
    pub queues: ResponseCache<Vec<QueueInfo>>,
    pub messages: ResponseCache<Vec<Message>>,
}

impl ApiCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.queues.clear();
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.queues.len() + self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sweep for ApiCache {
    fn sweep(&self) -> usize {
        self.queues.cleanup() + self.messages.cleanup()
    }
}
