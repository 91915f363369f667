//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use feed_gateway::config::GatewayConfig;
use feed_gateway::http::HttpServer;
use feed_gateway::lifecycle::Shutdown;

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` decides status and body per request; sleeping inside it simulates a
/// slow upstream. Returns the bound address and a hit counter.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Arc<AtomicUsize>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        // Drain the request head; a single read is enough for a GET.
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        counter.fetch_add(1, Ordering::SeqCst);

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nX-Upstream: mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

/// Start a mock upstream that always returns `status` and `body`.
pub async fn start_static_backend(status: u16, body: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    start_programmable_backend(move || async move { (status, body.to_string()) }).await
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// Gateway config pointed at local mock upstreams.
pub fn config_for(primary: SocketAddr, secondary: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstreams.primary.url = format!("http://{}/partner-feed", primary);
    config.upstreams.secondary.url = format!("http://{}/tvt-feed", secondary);
    config.upstreams.primary.timeout_ms = 2_000;
    config.upstreams.secondary.timeout_ms = 2_000;
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
