mod common;

use axum_test::TestServer;
use shortlink_tracker::domain::entities::{ClickEvent, RequestMetadata};
use shortlink_tracker::domain::repositories::EventStore;

async fn seed(ctx: &common::TestContext) {
    let events = [
        ("test123", "test-agent", "127.0.0.1"),
        ("test123", "test-agent-2", "127.0.0.2"),
        ("different", "test-agent-3", "127.0.0.3"),
    ];

    for (id, agent, address) in events {
        ctx.store
            .append(ClickEvent::new(
                id,
                RequestMetadata::new(Some(agent), Some(address.to_string())),
            ))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_list_all() {
    let ctx = common::create_test_context();
    seed(&ctx).await;

    let server = TestServer::new(common::create_test_router(ctx.state.clone())).unwrap();
    let response = server.get("/analytics/list").await;

    response.assert_status_ok();
    assert!(
        response
            .header("content-type")
            .to_str()
            .unwrap()
            .contains("json")
    );

    let json = response.json::<serde_json::Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);
    for field in ["shortId", "timestamp", "userAgent", "clientAddress"] {
        assert!(items[0].get(field).is_some(), "missing {field}");
    }
    assert_eq!(items[0]["userAgent"], "test-agent");
    assert_eq!(items[2]["shortId"], "different");
}

#[tokio::test]
async fn test_list_by_short_id() {
    let ctx = common::create_test_context();
    seed(&ctx).await;

    let server = TestServer::new(common::create_test_router(ctx.state.clone())).unwrap();
    let response = server.get("/analytics/test123").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["shortId"] == "test123"));
    assert_eq!(items[0]["clientAddress"], "127.0.0.1");
    assert_eq!(items[1]["clientAddress"], "127.0.0.2");
}

#[tokio::test]
async fn test_list_by_unknown_short_id_is_empty() {
    let ctx = common::create_test_context();
    seed(&ctx).await;

    let server = TestServer::new(common::create_test_router(ctx.state.clone())).unwrap();
    let response = server.get("/analytics/TEST123").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), serde_json::json!([]));
}

#[tokio::test]
async fn test_redirect_then_analytics_scenario() {
    let ctx = common::create_test_context();
    ctx.registry.put("test123", "https://example.com");

    let server = TestServer::new(common::create_test_router(ctx.state.clone())).unwrap();

    let response = server.get("/test123").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com");

    server.get("/nonexistent").await.assert_status_not_found();

    ctx.queue.drain().await;

    let json = server
        .get("/analytics/test123")
        .await
        .json::<serde_json::Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["shortId"], "test123");

    let all = server.get("/analytics/list").await.json::<serde_json::Value>();
    assert_eq!(all.as_array().unwrap().len(), 1);
}
