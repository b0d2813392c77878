//! Lookup seams for service metadata and secrets.
//!
//! The dispatcher only sees these traits; the file-backed registry is
//! the production implementation and tests substitute in-memory fakes.

use crate::errors::AppError;
use crate::registry::model::{SecretData, ServiceDescriptor};

/// Resolves a service ID to its target URL and credential descriptor.
#[async_trait::async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Returns the descriptor or `NotFound` for an unknown ID.
    async fn service(&self, service_id: &str) -> Result<ServiceDescriptor, AppError>;
}

/// Resolves a secret reference name to credential material.
#[async_trait::async_trait]
pub trait SecretLookup: Send + Sync {
    /// Returns the secret or `NotFound` for an unknown reference.
    async fn secret(&self, name: &str) -> Result<SecretData, AppError>;
}
