//! Integration tests for the `caldera fetch` client against a live server.

use std::net::SocketAddr;
use std::sync::Arc;

use caldera::cmd::fetch::fetch;
use caldera::middleware::{Correlation, TracingSink};
use caldera::provider::{GeneratedThingProvider, Thing};
use caldera::server::{self, AppState};

async fn start_test_server() -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let provider = Arc::new(GeneratedThingProvider::new(Thing::named("widget")));
    let correlation = Correlation::from_config(&Default::default(), Arc::new(TracingSink)).unwrap();
    let router = server::build_router(Arc::new(AppState::new(provider)), correlation, 1024);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

#[tokio::test]
async fn fetch_sends_and_reads_correlation_id() {
    let (addr, shutdown) = start_test_server().await;

    let outcome = fetch(&format!("http://{addr}/"), "RacCorrelationId", Some("cli-42"))
        .await
        .unwrap();
    assert!(outcome.status.is_success());
    assert_eq!(outcome.correlation_id.as_deref(), Some("cli-42"));

    let thing: Thing = serde_json::from_slice(&outcome.body).unwrap();
    assert_eq!(thing.name, "widget-1");
    assert!(thing.id.is_some());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn fetch_without_id_gets_generated_one() {
    let (addr, shutdown) = start_test_server().await;

    let outcome = fetch(&format!("http://{addr}"), "RacCorrelationId", None)
        .await
        .unwrap();
    let id = outcome.correlation_id.unwrap();
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn fetch_rejects_bad_url() {
    let result = fetch("not a url", "RacCorrelationId", None).await;
    assert!(result.is_err());
}
