//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request IDs are stamped by middleware and flow to the backend
//! - Metrics are cheap (atomic increments); the exporter is optional
//! - Per-request trace logging is a config toggle

pub mod logging;
pub mod metrics;
