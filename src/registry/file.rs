//! File-backed service registry.
//!
//! # Responsibilities
//! - Parse the services file (TOML) into an immutable snapshot
//! - Serve metadata and secret lookups from the current snapshot
//! - Swap in a new snapshot atomically on reload
//!
//! # Design Decisions
//! - Snapshots are immutable; readers never see a half-applied reload
//! - A reload that fails to parse keeps the previous snapshot

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Deserialize;

use crate::errors::AppError;
use crate::registry::lookup::{MetadataLookup, SecretLookup};
use crate::registry::model::{SecretData, ServiceDescriptor};

/// On-disk shape of the services file.
#[derive(Debug, Deserialize, Default)]
struct RegistryFile {
    #[serde(default)]
    services: Vec<ServiceDescriptor>,

    #[serde(default)]
    secrets: Vec<NamedSecret>,
}

#[derive(Debug, Deserialize)]
struct NamedSecret {
    name: String,
    client_id: String,
    client_secret: String,
}

/// One parsed generation of the services file.
#[derive(Debug, Default)]
struct Snapshot {
    services: HashMap<String, ServiceDescriptor>,
    secrets: HashMap<String, SecretData>,
}

impl Snapshot {
    fn from_file(file: RegistryFile) -> Self {
        let services = file
            .services
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        let secrets = file
            .secrets
            .into_iter()
            .map(|s| {
                (
                    s.name,
                    SecretData {
                        client_id: s.client_id,
                        client_secret: s.client_secret,
                    },
                )
            })
            .collect();
        Self { services, secrets }
    }
}

/// Registry serving lookups from an atomically swappable snapshot.
pub struct FileRegistry {
    path: PathBuf,
    current: ArcSwap<Snapshot>,
}

impl FileRegistry {
    /// Load the registry from the given services file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let snapshot = read_snapshot(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            current: ArcSwap::from_pointee(snapshot),
        })
    }

    /// Re-read the services file and swap in the new snapshot.
    ///
    /// On failure the previous snapshot stays current.
    pub fn reload(&self) -> Result<(), AppError> {
        let snapshot = read_snapshot(&self.path)?;
        let count = snapshot.services.len();
        self.current.store(Arc::new(snapshot));
        tracing::info!(services = count, path = ?self.path, "Service registry reloaded");
        Ok(())
    }

    /// Number of registered services in the current snapshot.
    pub fn len(&self) -> usize {
        self.current.load().services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Internal(format!("failed to read services file: {}", e)))?;
    let file: RegistryFile = toml::from_str(&content)
        .map_err(|e| AppError::Internal(format!("failed to parse services file: {}", e)))?;
    Ok(Snapshot::from_file(file))
}

#[async_trait::async_trait]
impl MetadataLookup for FileRegistry {
    async fn service(&self, service_id: &str) -> Result<ServiceDescriptor, AppError> {
        self.current
            .load()
            .services
            .get(service_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("service {} not registered", service_id)))
    }
}

#[async_trait::async_trait]
impl SecretLookup for FileRegistry {
    async fn secret(&self, name: &str) -> Result<SecretData, AppError> {
        self.current
            .load()
            .secrets
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("secret {} not found", name)))
    }
}
