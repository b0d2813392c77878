//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! services file (TOML)
//!     → file.rs (parse into immutable snapshot, ArcSwap current)
//!     → lookup.rs traits (MetadataLookup / SecretLookup)
//!     → consumed by the dispatcher on backend cache misses
//!
//! On file change:
//!     watcher.rs detects modification
//!     → registry.reload() parses and swaps the snapshot
//!     → parse failure keeps the previous snapshot
//! ```
//!
//! # Design Decisions
//! - The dispatcher depends on the lookup traits, not on this
//!   implementation; tests plug in-memory fakes
//! - Reload is atomic from the reader's perspective (ArcSwap)

pub mod file;
pub mod lookup;
pub mod model;
pub mod watcher;

pub use file::FileRegistry;
pub use lookup::{MetadataLookup, SecretLookup};
pub use model::{
    CredentialDescriptor, CredentialKind, RequestParameters, SecretData, ServiceDescriptor,
};
