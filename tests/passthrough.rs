//! End-to-end tests for the allow-listed passthrough proxy.

use std::sync::atomic::Ordering;

use serde_json::{json, Value};

mod common;

async fn start(allow: &[&str]) -> (std::net::SocketAddr, feed_gateway::Shutdown) {
    let (primary, _) = common::start_static_backend(200, r#"{"id":1}"#).await;
    let (secondary, _) = common::start_static_backend(200, r#"{"usersOnJams":[]}"#).await;
    let mut config = common::config_for(primary, secondary);
    config.passthrough.allow_list = allow.iter().map(|h| h.to_string()).collect();
    config.passthrough.timeout_ms = 1_000;
    common::start_gateway(config).await
}

#[tokio::test]
async fn test_missing_target_is_400() {
    let (gateway, shutdown) = start(&["127.0.0.1"]).await;

    let res = common::client()
        .get(format!("http://{}/api/proxy", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Missing ?url=" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unlisted_host_is_403() {
    let (backend, hits) = common::start_static_backend(200, "secret").await;
    let (gateway, shutdown) = start(&["www.waze.com"]).await;
    let target = format!("http://{}/internal", backend);

    let res = common::client()
        .get(format!("http://{}/api/proxy", gateway))
        .query(&[("url", target.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Host not allowed", "target": target }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_allowed_target_is_relayed() {
    let (backend, hits) = common::start_static_backend(503, r#"{"message":"busy"}"#).await;
    let (gateway, shutdown) = start(&["127.0.0.1"]).await;

    let res = common::client()
        .get(format!("http://{}/api/proxy", gateway))
        .query(&[("url", format!("http://{}/feeds/incidents?region=nw", backend))])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    assert_eq!(res.headers()["x-upstream"], "mock");
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(res.headers()["access-control-allow-methods"], "GET, HEAD, OPTIONS");
    assert_eq!(res.headers()["cross-origin-resource-policy"], "cross-origin");
    assert_eq!(res.text().await.unwrap(), r#"{"message":"busy"}"#);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_preflight_is_204() {
    let (gateway, shutdown) = start(&["127.0.0.1"]).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, format!("http://{}/api/proxy", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 204);
    assert_eq!(res.headers()["access-control-allow-headers"], "*");
    assert!(res.bytes().await.unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_target_is_502() {
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (gateway, shutdown) = start(&["127.0.0.1"]).await;

    let res = common::client()
        .get(format!("http://{}/api/proxy", gateway))
        .query(&[("url", format!("http://{}/", closed))])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Proxy error");
    assert!(!body["detail"].as_str().unwrap().is_empty());

    shutdown.trigger();
}
