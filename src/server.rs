//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the thing
//! provider), [`build_router`] for constructing
//! the Axum router with its middleware stack, and [`shutdown_signal`]
//! for SIGTERM / Ctrl+C handling.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{correlation_middleware, Correlation};
use crate::provider::ThingProvider;
use crate::thing::thing_handler;

pub const THING_PATH: &str = "/thing";

pub struct AppState {
    pub provider: Arc<dyn ThingProvider>,
}

impl AppState {
    #[must_use]
    pub fn new(provider: Arc<dyn ThingProvider>) -> Self {
        Self { provider }
    }
}

/// Build the router. Layer order, outermost first: correlation, trace,
/// panic-to-500, body limit. The correlation layer wraps everything so
/// its header lands on every response, panics and 404s included.
pub fn build_router(state: Arc<AppState>, correlation: Correlation, max_body: usize) -> Router {
    Router::new()
        .route(THING_PATH, get(thing_handler))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    correlation,
                    correlation_middleware,
                ))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
