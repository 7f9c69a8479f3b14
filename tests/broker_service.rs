//! Integration tests for cached reads and cache invalidation
//!
//! Runs the broker service against a mock HTTP server and checks which calls reach
//! the network and which cache keys survive each mutation.

use std::sync::Arc;
use std::time::Duration;

use broker_console::api::BrokerApiClient;
use broker_console::models::cache::{messages_key, queues_key};
use broker_console::models::{Message, QueueInfo, RequeueOperation, SendMessageRequest};
use broker_console::{ApiCache, BrokerService, Config, ConsoleError};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn scoped(connection_id: &str) -> Matcher {
    Matcher::UrlEncoded("connectionId".into(), connection_id.into())
}

async fn setup() -> (ServerGuard, BrokerService, Arc<ApiCache>) {
    let server = Server::new_async().await;
    let config = Config {
        base_url: server.url(),
        ..Config::default()
    };
    let api = Arc::new(BrokerApiClient::new(&config.base_url, config.request_timeout).unwrap());
    let cache = Arc::new(ApiCache::new());
    let service = BrokerService::new(api, cache.clone(), &config);
    (server, service, cache)
}

fn message(id: &str, body: &str) -> Message {
    Message {
        id: id.to_string(),
        body: body.to_string(),
        headers: None,
        timestamp: None,
    }
}

fn queue(name: &str) -> QueueInfo {
    serde_json::from_value(json!({"name": name})).unwrap()
}

#[tokio::test]
async fn test_queue_listing_is_fetched_once() {
    let (mut server, service, cache) = setup().await;
    let mock = server
        .mock("GET", "/api/queues")
        .match_query(scoped("A"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name":"q1","queueSize":3,"enqueueCount":5,"dequeueCount":2,"consumerCount":1}]"#)
        .expect(1)
        .create_async()
        .await;

    let first = service.fetch_queues("A").await.unwrap();
    let second = service.fetch_queues("A").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].name, "q1");
    assert_eq!(first[0].queue_size, 3);
    assert!(cache.queues.has(&queues_key("A")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_queue_listing_accepts_wrapped_payload() {
    let (mut server, service, _cache) = setup().await;
    server
        .mock("GET", "/api/queues")
        .match_query(scoped("B"))
        .with_status(200)
        .with_body(r#"{"queues":[{"name":"a"},{"name":"b"}]}"#)
        .create_async()
        .await;

    let queues = service.fetch_queues("B").await.unwrap();
    assert_eq!(queues.len(), 2);
}

#[tokio::test]
async fn test_connections_are_cached_separately() {
    let (mut server, service, _cache) = setup().await;
    let a = server
        .mock("GET", "/api/queues")
        .match_query(scoped("A"))
        .with_status(200)
        .with_body(r#"[{"name":"from-a"}]"#)
        .expect(1)
        .create_async()
        .await;
    let b = server
        .mock("GET", "/api/queues")
        .match_query(scoped("B"))
        .with_status(200)
        .with_body(r#"[{"name":"from-b"}]"#)
        .expect(1)
        .create_async()
        .await;

    assert_eq!(service.fetch_queues("A").await.unwrap()[0].name, "from-a");
    assert_eq!(service.fetch_queues("B").await.unwrap()[0].name, "from-b");
    a.assert_async().await;
    b.assert_async().await;
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let (mut server, service, cache) = setup().await;
    let failing = server
        .mock("GET", "/api/queues/q1/messages")
        .match_query(scoped("A"))
        .with_status(503)
        .with_body("broker down")
        .expect(2)
        .create_async()
        .await;

    for _ in 0..2 {
        let err = service.fetch_messages("q1", "A").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Http { ref body, .. } if body == "broker down"));
    }

    assert!(cache.messages.get(&messages_key("q1", "A")).is_none());
    failing.assert_async().await;
}

#[tokio::test]
async fn test_delete_message_invalidates_messages_only() {
    let (mut server, service, cache) = setup().await;
    cache
        .messages
        .set(&messages_key("q1", "A"), vec![message("m1", "hello")], Duration::from_secs(3));
    cache.queues.set(&queues_key("A"), vec![queue("q1")], Duration::from_secs(10));

    let mock = server
        .mock("DELETE", "/api/queues/q1/messages/m1")
        .match_query(scoped("A"))
        .with_status(204)
        .create_async()
        .await;

    service.delete_message("q1", "m1", "A").await.unwrap();

    assert!(cache.messages.get(&messages_key("q1", "A")).is_none());
    assert!(cache.queues.has(&queues_key("A")));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_mutation_leaves_cache_untouched() {
    let (mut server, service, cache) = setup().await;
    let cached = vec![message("m1", "hello")];
    cache.messages.set(&messages_key("q1", "A"), cached.clone(), Duration::from_secs(3));
    server
        .mock("DELETE", "/api/queues/q1/messages/m1")
        .match_query(scoped("A"))
        .with_status(500)
        .create_async()
        .await;

    assert!(service.delete_message("q1", "m1", "A").await.is_err());
    assert_eq!(cache.messages.get(&messages_key("q1", "A")), Some(cached));
}

#[tokio::test]
async fn test_purge_invalidates_messages_and_queues() {
    let (mut server, service, cache) = setup().await;
    cache
        .messages
        .set(&messages_key("q1", "A"), vec![message("m1", "x")], Duration::from_secs(3));
    cache.queues.set(&queues_key("A"), vec![queue("q1")], Duration::from_secs(10));
    cache.queues.set(&queues_key("B"), vec![queue("q1")], Duration::from_secs(10));

    server
        .mock("DELETE", "/api/queues/q1/messages")
        .match_query(scoped("A"))
        .with_status(200)
        .create_async()
        .await;

    service.purge_queue("q1", "A").await.unwrap();

    assert!(!cache.messages.has(&messages_key("q1", "A")));
    assert!(!cache.queues.has(&queues_key("A")));
    assert!(cache.queues.has(&queues_key("B")), "other connections keep their listing");
}

#[tokio::test]
async fn test_send_message_returns_confirmation_and_invalidates() {
    let (mut server, service, cache) = setup().await;
    cache
        .messages
        .set(&messages_key("q1", "A"), Vec::new(), Duration::from_secs(3));

    let mock = server
        .mock("POST", "/api/queues/q1/messages")
        .match_query(scoped("A"))
        .match_body(Matcher::PartialJson(json!({"body": "ping"})))
        .with_status(201)
        .with_body("ID:abc-1")
        .create_async()
        .await;

    let confirmation = service
        .send_message("q1", &SendMessageRequest::text("ping"), "A")
        .await
        .unwrap();

    assert_eq!(confirmation, "ID:abc-1");
    assert!(cache.messages.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_requeue_cut_moves_and_tolerates_delete_failures() {
    let (mut server, service, _cache) = setup().await;
    server
        .mock("GET", "/api/queues/dlq/messages")
        .match_query(scoped("A"))
        .with_status(200)
        .with_body(r#"[{"id":"m1","body":"one"},{"id":"m2","body":"two"},{"id":"m3","body":"three"}]"#)
        .create_async()
        .await;
    let sends = server
        .mock("POST", "/api/queues/orders/messages")
        .match_query(scoped("A"))
        .match_body(Matcher::PartialJson(json!({"priority": 4, "timeToLive": 0, "persistent": true})))
        .with_status(201)
        .with_body("ok")
        .expect(2)
        .create_async()
        .await;
    let delete_m1 = server
        .mock("DELETE", "/api/queues/dlq/messages/m1")
        .match_query(scoped("A"))
        .with_status(204)
        .create_async()
        .await;
    let delete_m2 = server
        .mock("DELETE", "/api/queues/dlq/messages/m2")
        .match_query(scoped("A"))
        .with_status(500)
        .create_async()
        .await;

    let moved = service
        .requeue_messages(
            "dlq",
            "orders",
            &["m1".to_string(), "m2".to_string()],
            RequeueOperation::Cut,
            "A",
        )
        .await
        .unwrap();

    assert_eq!(moved, 2);
    sends.assert_async().await;
    delete_m1.assert_async().await;
    delete_m2.assert_async().await;
}

#[tokio::test]
async fn test_requeue_without_matches_sends_nothing() {
    let (mut server, service, cache) = setup().await;
    cache
        .messages
        .set(&messages_key("dlq", "A"), vec![message("m1", "one")], Duration::from_secs(3));
    let sends = server
        .mock("POST", "/api/queues/orders/messages")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = service
        .requeue_messages("dlq", "orders", &["m9".to_string()], RequeueOperation::Copy, "A")
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::NothingToRequeue(queue) if queue == "dlq"));
    sends.assert_async().await;
}

#[tokio::test]
async fn test_connectivity_probe() {
    let (mut server, service, _cache) = setup().await;
    server
        .mock("GET", "/api/broker/metrics")
        .match_query(scoped("A"))
        .with_status(200)
        .with_body(r#"{"brokerName":"localhost","status":"RUNNING","cpuUsage":12.5}"#)
        .create_async()
        .await;

    let metrics = service.fetch_metrics("A").await.unwrap();
    assert_eq!(metrics.broker_name, "localhost");
    assert_eq!(metrics.cpu_usage, 12.5);

    assert!(service.check_connectivity(Some("A")).await.connected);
    assert!(!service.check_connectivity(Some("B")).await.connected);

    let none = service.check_connectivity(None).await;
    assert!(!none.connected);
    assert_eq!(none.error.as_deref(), Some("No active connection"));
}
