//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gateway handler
//! - Wire up middleware (timeout, request ID, optional trace logging)
//! - Resolve the service ID from the Host header
//! - Acquire (or build) the cached backend entry
//! - Attach authorization and forward to the target
//! - Run the single-retry protocol on auth failures
//! - Stream the final response back to the caller

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::auth::{build_strategy, TokenCache, TokenFetcher};
use crate::config::GatewayConfig;
use crate::errors::AppError;
use crate::observability::metrics;
use crate::proxy::forward;
use crate::proxy::{BackendCache, BackendEntry};
use crate::registry::{MetadataLookup, SecretLookup};
use crate::resilience::Retrier;
use crate::routing::HostResolver;

/// Application state injected into the gateway handler.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<HostResolver>,
    pub metadata: Arc<dyn MetadataLookup>,
    pub secrets: Arc<dyn SecretLookup>,
    pub backend_cache: BackendCache,
    pub token_cache: TokenCache,
    pub token_fetcher: Arc<TokenFetcher>,
    pub skip_verify: bool,
    pub proxy_timeout: Duration,
    pub max_body_bytes: usize,
}

/// HTTP server for the gateway's proxy listener.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server wired to the given lookups and caches.
    pub fn new(
        config: &GatewayConfig,
        metadata: Arc<dyn MetadataLookup>,
        secrets: Arc<dyn SecretLookup>,
        backend_cache: BackendCache,
        token_cache: TokenCache,
    ) -> Result<Self, AppError> {
        let token_fetcher = Arc::new(TokenFetcher::new(
            Duration::from_secs(config.timeouts.token_secs),
            config.tls.skip_verify,
        )?);

        let state = AppState {
            resolver: Arc::new(HostResolver::new(&config.gateway.environment)),
            metadata,
            secrets,
            backend_cache,
            token_cache,
            token_fetcher,
            skip_verify: config.tls.skip_verify,
            proxy_timeout: Duration::from_secs(config.timeouts.proxy_secs),
            max_body_bytes: config.limits.max_body_bytes,
        };

        Ok(Self {
            router: Self::build_router(config, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        if config.observability.request_logging {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Proxy server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Proxy server stopped");
        Ok(())
    }
}

/// Main gateway handler.
///
/// Drives the per-request pipeline: resolve → acquire entry →
/// pre-authorize → forward → retry-once-on-auth-failure → return.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let method_str = method.to_string();

    let host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let service_id = state.resolver.extract_service_id(host);

    tracing::debug!(
        service_id = %service_id,
        method = %method,
        path = %request.uri().path(),
        "Dispatching request"
    );

    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    let (parts, body) = request.into_parts();
    let (mut fwd_headers, external) = forward::prepare_headers(&parts.headers);

    // Buffered so the retry protocol can replay it.
    let body_bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => {
            let err = AppError::WrongInput("request body exceeds the buffer limit".into());
            metrics::record_request(&method_str, err.status().as_u16(), start);
            return err.into_response();
        }
    };

    // Acquire backend entry (cache hit or metadata lookup + build).
    let entry = match acquire_entry(&state, &service_id).await {
        Ok(entry) => entry,
        Err(err) => {
            tracing::warn!(service_id = %service_id, error = %err, "Backend entry unavailable");
            metrics::record_request(&method_str, err.status().as_u16(), start);
            return err.into_response();
        }
    };

    let mut target = forward::build_target_url(&entry.target_url, &path, query.as_deref());
    if let Some(params) = &entry.request_parameters {
        forward::apply_request_parameters(params, &mut fwd_headers, &mut target);
    }

    // Pre-authorize: surface credential-fetch failures here instead of
    // forwarding an unauthenticated request.
    if let Err(err) = entry.strategy.attach(external.as_ref(), &mut fwd_headers).await {
        tracing::warn!(service_id = %service_id, error = %err, "Authorization failed");
        metrics::record_request(&method_str, err.status().as_u16(), start);
        return err.into_response();
    }

    let response = match forward::send(
        &entry.client,
        method.clone(),
        target,
        fwd_headers,
        body_bytes.clone(),
        state.proxy_timeout,
    )
    .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(service_id = %service_id, error = %e, "Upstream error");
            metrics::record_request(&method_str, 502, start);
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    let mut retrier = Retrier::new();
    let response = if retrier.should_retry(response.status()) {
        tracing::info!(
            service_id = %service_id,
            status = %response.status(),
            "Auth failure from backend, invalidating and retrying once"
        );
        metrics::record_retry();

        // Drop the cached credential and the whole entry so the retry
        // runs against freshly built state.
        entry.strategy.invalidate();
        state.backend_cache.remove(&service_id);

        match retry_once(
            &state,
            &service_id,
            method,
            &path,
            query.as_deref(),
            &parts.headers,
            external.as_ref(),
            body_bytes,
        )
        .await
        {
            Ok(retried) => retried,
            Err(err) => {
                // The retry failure surfaces; the original 401/403 is
                // not silently returned as a stale success.
                metrics::record_request(&method_str, err.status().as_u16(), start);
                return err.into_response();
            }
        }
    } else {
        response
    };

    metrics::record_request(&method_str, response.status().as_u16(), start);
    into_response(response)
}

/// Get the backend entry from the cache, building it on a miss.
async fn acquire_entry(state: &AppState, service_id: &str) -> Result<Arc<BackendEntry>, AppError> {
    if let Some(entry) = state.backend_cache.get(service_id) {
        metrics::record_backend_cache_hit();
        return Ok(entry);
    }
    metrics::record_backend_cache_miss();

    let descriptor = state.metadata.service(service_id).await?;

    let target_url = Url::parse(&descriptor.target_url).map_err(|e| {
        AppError::Internal(format!(
            "invalid target URL for service {}: {}",
            service_id, e
        ))
    })?;
    let client = forward::build_forward_client(state.skip_verify)?;
    let strategy = build_strategy(
        descriptor.credentials.as_ref(),
        state.secrets.as_ref(),
        &state.token_cache,
        &state.token_fetcher,
    )
    .await?;

    tracing::debug!(service_id = %service_id, target = %target_url, "Backend entry built");

    Ok(state.backend_cache.put(
        service_id,
        BackendEntry {
            target_url,
            client,
            strategy,
            request_parameters: descriptor.request_parameters,
        },
    ))
}

/// Re-issue the request once against a freshly built backend entry.
#[allow(clippy::too_many_arguments)]
async fn retry_once(
    state: &AppState,
    service_id: &str,
    method: Method,
    path: &str,
    query: Option<&str>,
    inbound_headers: &axum::http::HeaderMap,
    external: Option<&HeaderValue>,
    body: axum::body::Bytes,
) -> Result<reqwest::Response, AppError> {
    let entry = acquire_entry(state, service_id).await?;

    let (mut headers, _) = forward::prepare_headers(inbound_headers);
    let mut target = forward::build_target_url(&entry.target_url, path, query);
    if let Some(params) = &entry.request_parameters {
        forward::apply_request_parameters(params, &mut headers, &mut target);
    }
    entry.strategy.attach(external, &mut headers).await?;

    forward::send(
        &entry.client,
        method,
        target,
        headers,
        body,
        state.proxy_timeout,
    )
    .await
    .map_err(|e| AppError::UpstreamServerCallFailed(format!("retry failed: {}", e)))
}

/// Convert the backend response into an axum response, streaming the
/// body through unmodified.
fn into_response(response: reqwest::Response) -> Response {
    let status = response.status();
    let headers = forward::copy_response_headers(response.headers());

    let mut out = Response::new(Body::from_stream(response.bytes_stream()));
    *out.status_mut() = status;
    *out.headers_mut() = headers;
    out
}
