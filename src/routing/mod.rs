//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host header)
//!     → resolver.rs (strip routing prefix from first host label)
//!     → Return: service ID (possibly empty)
//!
//! Service ID
//!     → backend descriptor cache / metadata lookup (proxy subsystem)
//! ```
//!
//! # Design Decisions
//! - Resolution is prefix stripping only; deterministic and allocation-light
//! - Malformed hosts produce an empty ID, which fails the later lookup
//!   with not-found instead of a special error path here

pub mod resolver;

pub use resolver::HostResolver;
