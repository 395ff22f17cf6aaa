#![cfg(feature = "http")]

mod common;

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use common::*;
use nervekit::{
    HttpStats, HttpStatsConfig, LifecycleError, Service, ServiceConfig, StatsError, StatsReporter,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn free_addr() -> SocketAddr {
    let probe = TcpListener::bind("127.0.0.1:0").unwrap();
    probe.local_addr().unwrap()
}

async fn get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut buf = String::new();
    stream.read_to_string(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn serves_live_service_stats() {
    let addr = free_addr();
    let stats = Arc::new(HttpStats::new(HttpStatsConfig { addr }));
    let service = Service::builder(ServiceConfig::default())
        .with_component(FakeComponent::new("db"))
        .with_stats(stats.clone())
        .build()
        .unwrap();

    service.connect().await.unwrap();
    assert_eq!(stats.local_addr(), Some(addr));

    let task = service.new_task(None).unwrap();

    let health = within(get(addr, "/healthcheck")).await;
    assert!(health.starts_with("HTTP/1.1 200"), "{health}");
    assert!(health.ends_with("OK"));

    let body = within(get(addr, "/stats")).await;
    assert!(body.starts_with("HTTP/1.1 200"), "{body}");
    assert!(body.ends_with(r#"{"ok":true,"currentTasks":1}"#), "{body}");

    let missing = within(get(addr, "/metrics")).await;
    assert!(missing.starts_with("HTTP/1.1 404"), "{missing}");

    task.done();
    service.poweroff(0).await.unwrap();
    assert!(stats.local_addr().is_none());
}

#[tokio::test]
async fn missing_port_fails_connect() {
    let stats = Arc::new(HttpStats::new(HttpStatsConfig::port(0)));
    let service = Service::builder(ServiceConfig::default())
        .with_stats(stats)
        .build()
        .unwrap();

    let err = service.connect().await.unwrap_err();
    assert!(matches!(err, LifecycleError::Stats(StatsError::MissingPort)));
    assert!(!service.is_started());
}

#[tokio::test]
async fn second_init_is_refused() {
    let stats = HttpStats::new(HttpStatsConfig { addr: free_addr() });
    stats.init().unwrap();
    assert!(matches!(stats.init(), Err(StatsError::AlreadyRunning)));
    stats.exit().unwrap();
}
