//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, gateway handler)
//!     → routing resolver decides the service ID
//!     → proxy subsystem forwards to the target
//!     → response streamed back to the client
//!
//! Status traffic
//!     → external_api.rs (health endpoint on its own port)
//! ```

pub mod external_api;
pub mod server;

pub use server::{AppState, HttpServer};
