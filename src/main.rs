//! Application Gateway
//!
//! An HTTP reverse proxy injecting per-backend authorization.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │               APPLICATION GATEWAY                 │
//!                    │                                                   │
//!   Client Request   │  ┌─────────┐   ┌────────────┐   ┌─────────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│  routing   │──▶│  backend    │  │
//!                    │  │ server  │   │  resolver  │   │  cache      │  │
//!                    │  └─────────┘   └────────────┘   └──────┬──────┘  │
//!                    │                                        │ miss    │
//!                    │                                        ▼         │
//!                    │                                 ┌─────────────┐  │
//!                    │                                 │  registry   │  │
//!                    │                                 │  (metadata, │  │
//!                    │                                 │   secrets)  │  │
//!                    │                                 └──────┬──────┘  │
//!                    │                                        │         │
//!                    │  ┌─────────┐   ┌────────────┐   ┌──────▼──────┐  │
//!   Client Response  │  │response │◀──│ retrier    │◀──│ auth +      │◀─┼── Backend
//!   ◀────────────────┼──│ stream  │   │ (401/403)  │   │ forward     │  │
//!                    │  └─────────┘   └────────────┘   └─────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use application_gateway::auth::TokenCache;
use application_gateway::config::loader::load_config;
use application_gateway::http::{external_api, HttpServer};
use application_gateway::lifecycle::Shutdown;
use application_gateway::observability::{logging, metrics};
use application_gateway::proxy::BackendCache;
use application_gateway::registry::{watcher, FileRegistry};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "application-gateway")]
struct Args {
    /// Path to the gateway configuration file.
    #[arg(long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Path to the services registry file.
    #[arg(long, default_value = "services.toml")]
    services: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        environment = %config.gateway.environment,
        namespace = %config.gateway.namespace,
        proxy_address = %config.listener.proxy_address,
        external_api_address = %config.listener.external_api_address,
        proxy_cache_ttl_secs = config.cache.proxy_ttl_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Service registry with hot reload.
    let registry = Arc::new(FileRegistry::load(&args.services)?);
    tracing::info!(services = registry.len(), "Service registry loaded");
    let _watcher = watcher::watch_registry(registry.clone(), &args.services)?;

    // Shared caches and their sweepers.
    let shutdown = Shutdown::new();
    let sweep_interval = Duration::from_secs(config.cache.sweep_interval_secs);

    let token_cache = TokenCache::new();
    tokio::spawn(
        token_cache
            .clone()
            .run_sweeper(sweep_interval, shutdown.subscribe()),
    );

    let backend_cache = BackendCache::new(Duration::from_secs(config.cache.proxy_ttl_secs));
    tokio::spawn(
        backend_cache
            .clone()
            .run_sweeper(sweep_interval, shutdown.subscribe()),
    );

    // External API listener.
    let external_listener = TcpListener::bind(&config.listener.external_api_address).await?;
    tokio::spawn(external_api::run(external_listener, shutdown.subscribe()));

    // Proxy listener.
    let listener = TcpListener::bind(&config.listener.proxy_address).await?;
    let server = HttpServer::new(
        &config,
        registry.clone(),
        registry,
        backend_cache,
        token_cache,
    )?;

    let server_shutdown = shutdown.subscribe();
    let serve = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    shutdown.trigger();

    serve.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
