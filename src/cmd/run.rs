//! `caldera run` — start the server.
//!
//! Loads configuration from an explicit or auto-detected file (falling
//! back to built-in defaults), wires the thing provider and correlation
//! middleware, and serves until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::{sources, LoadedConfig};
use crate::error::CalderaError;
use crate::logging;
use crate::middleware::{Correlation, TracingSink};
use crate::provider;
use crate::server::{self, AppState, THING_PATH};

pub async fn execute(args: RunArgs) -> Result<(), CalderaError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let cwd = std::env::current_dir()?;
    let source = sources::resolve_file_source(args.config.as_deref(), &cwd).await?;
    let loaded = LoadedConfig::load(source.as_deref()).await?;

    let provider = provider::from_config(&loaded.config.thing);
    let provider_name = provider.name();
    let correlation = Correlation::from_config(&loaded.config.correlation, Arc::new(TracingSink))?;
    let header = correlation.header().clone();

    let state = Arc::new(AppState::new(provider));
    let router = server::build_router(state, correlation, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        path = THING_PATH,
        provider = provider_name,
        correlation_header = %header,
        config_source = %loaded.source_name,
        config_version = loaded.version.short(),
        build = env!("CALDERA_GIT_SHORT"),
        profile = env!("CALDERA_BUILD_PROFILE"),
        "caldera started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("caldera stopped");
    Ok(())
}
