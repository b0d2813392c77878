//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from
//! config files, and every section has defaults so a minimal config
//! is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the application gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (proxy and external API bind addresses).
    pub listener: ListenerConfig,

    /// Gateway identity (environment, namespace).
    pub gateway: IdentityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Outbound TLS settings.
    pub tls: TlsConfig,

    /// Cache TTL and sweep settings.
    pub cache: CacheConfig,

    /// Request body limits.
    pub limits: LimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address for the proxy listener (e.g., "0.0.0.0:8080").
    pub proxy_address: String,

    /// Bind address for the external API listener (health/status).
    pub external_api_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            proxy_address: "0.0.0.0:8080".to_string(),
            external_api_address: "0.0.0.0:8081".to_string(),
        }
    }
}

/// Gateway identity used to derive the routing prefix.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Environment name embedded in service host names.
    pub environment: String,

    /// Namespace the gateway serves.
    pub namespace: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            environment: "default".to_string(),
            namespace: "default".to_string(),
        }
    }
}

/// Timeout configuration for the gateway's outbound operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total inbound request timeout in seconds.
    pub request_secs: u64,

    /// Per-forward timeout toward the backend in seconds.
    pub proxy_secs: u64,

    /// OAuth token fetch timeout in seconds.
    pub token_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            proxy_secs: 10,
            token_secs: 5,
        }
    }
}

/// Outbound TLS settings.
///
/// `skip_verify` disables certificate verification toward backends and
/// token issuers to support self-signed internal endpoints. Off by
/// default.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TlsConfig {
    pub skip_verify: bool,
}

/// Cache TTL and sweep settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend descriptor cache TTL in seconds.
    pub proxy_ttl_secs: u64,

    /// Interval between expired-entry sweeps in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            proxy_ttl_secs: 120,
            sweep_interval_secs: 30,
        }
    }
}

/// Request body limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum buffered request body size in bytes.
    ///
    /// Bodies are buffered so the retry protocol can replay them.
    pub max_body_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log every proxied request via the HTTP trace layer.
    pub request_logging: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_logging: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
