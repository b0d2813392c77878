//! External API listener.
//!
//! Small status surface served on its own port, separate from the
//! proxy listener.

use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Build the external API router.
pub fn build_router() -> Router {
    Router::new().route("/v1/health", get(health))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Run the external API server until the shutdown signal fires.
pub async fn run(
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "External API server starting");

    axum::serve(listener, build_router())
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("External API server stopped");
    Ok(())
}
