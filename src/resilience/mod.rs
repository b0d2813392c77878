//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Backend response
//!     → retry.rs (401/403 and retry not yet consumed?)
//!     → dispatcher: invalidate strategy credential, evict backend
//!       entry, rebuild, re-attach, re-issue once
//!     → retried response replaces the original
//! ```
//!
//! # Design Decisions
//! - Exactly one retry per request; no backoff, no loop
//! - A retry-time error surfaces instead of the original 401/403

pub mod retry;

pub use retry::Retrier;
