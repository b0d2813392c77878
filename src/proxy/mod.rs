//! Proxy subsystem: backend entries and forwarding.
//!
//! # Data Flow
//! ```text
//! service ID
//!     → cache.rs (get; miss → dispatcher performs metadata lookup,
//!       builds the forwarding client + auth strategy, put)
//!     → BackendEntry { target URL, client, strategy }
//!
//! forwarding:
//!     inbound request
//!     → forward.rs (target URL rewrite, header copy, send under the
//!       per-forward timeout)
//!     → backend response streamed back to the caller
//! ```
//!
//! # Design Decisions
//! - One entry per service ID, fixed uniform TTL, last writer wins on
//!   concurrent builds
//! - Path join is slash-aware: never a doubled or missing slash

pub mod cache;
pub mod forward;

pub use cache::{BackendCache, BackendEntry};
