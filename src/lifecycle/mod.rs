//! Lifecycle subsystem.
//!
//! # Design Decisions
//! - One broadcast channel fans the shutdown signal out to servers and
//!   background sweepers; no task is force-aborted
//! - Nothing here is fatal to a request in flight

pub mod shutdown;

pub use shutdown::Shutdown;
