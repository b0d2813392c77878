//! Authorization subsystem.
//!
//! # Data Flow
//! ```text
//! Backend entry creation:
//!     CredentialDescriptor + SecretLookup
//!     → strategy.rs (build_strategy, once per entry)
//!     → AuthStrategy cached with the entry
//!
//! Per request:
//!     AuthStrategy::attach
//!     → oauth variant: token_cache.rs get → miss: oauth.rs fetch → put
//!     → Authorization header set on the forwarded request
//!
//! On 401/403:
//!     AuthStrategy::invalidate → token cache remove → fresh fetch on
//!     the retry's attach
//! ```
//!
//! # Design Decisions
//! - Strategies hold credentials, never tokens; tokens live in the
//!   shared cache keyed by client ID
//! - A caller-supplied Access-Token short-circuits every variant

pub mod oauth;
pub mod strategy;
pub mod token_cache;

pub use oauth::TokenFetcher;
pub use strategy::{build_strategy, AuthStrategy, ACCESS_TOKEN_HEADER};
pub use token_cache::TokenCache;
