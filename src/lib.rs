//! Application Gateway Library
//!
//! An HTTP reverse proxy that sits between internal callers and
//! externally registered backend APIs. The service ID embedded in the
//! request's virtual host name is resolved to a target URL and
//! credential configuration; requests are forwarded with the correct
//! Authorization header injected, and a backend rejecting the injected
//! credentials triggers one transparent invalidate-and-retry pass.

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod registry;
pub mod resilience;
pub mod routing;

pub use config::GatewayConfig;
pub use errors::AppError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
