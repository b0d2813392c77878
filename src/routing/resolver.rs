//! Service ID resolution from virtual host names.
//!
//! # Responsibilities
//! - Build the routing prefix `re-<environment>-` for this gateway
//! - Derive the resource name for a service ID
//! - Extract the service ID from an inbound Host header
//!
//! # Design Decisions
//! - Pure functions over an immutable resolver; no shared state
//! - The transport layer caps names at 63 characters, so the
//!   environment component is truncated until prefix + 36-char ID
//!   fits; the ID suffix is never cut
//! - No ID format validation here; a malformed ID simply misses the
//!   metadata lookup later

/// Transport-layer ceiling on resource name length.
const MAX_RESOURCE_NAME_LEN: usize = 63;

/// Length of a canonical (UUID) service ID.
const SERVICE_ID_LEN: usize = 36;

/// Resolves service IDs to and from virtual host names.
#[derive(Debug, Clone)]
pub struct HostResolver {
    prefix: String,
}

impl HostResolver {
    /// Create a resolver for the given environment name.
    ///
    /// The environment component is truncated so that
    /// `prefix + 36-char ID` never exceeds the 63-character ceiling.
    pub fn new(environment: &str) -> Self {
        // "re-" + env + "-" must leave room for the full ID.
        let budget = MAX_RESOURCE_NAME_LEN - SERVICE_ID_LEN - "re-".len() - "-".len();
        let env: String = environment.chars().take(budget).collect();

        Self {
            prefix: format!("re-{}-", env),
        }
    }

    /// The routing prefix, including the trailing dash.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resource name for a service ID, e.g. `re-prod-<uuid>`.
    pub fn resource_name(&self, service_id: &str) -> String {
        format!("{}{}", self.prefix, service_id)
    }

    /// Extract the service ID from an inbound Host header.
    ///
    /// Takes the first dot-separated label and strips the routing
    /// prefix. Returns an empty string when the label does not carry
    /// the prefix; the downstream lookup then misses with not-found.
    pub fn extract_service_id(&self, host: &str) -> String {
        let label = host.split('.').next().unwrap_or("");
        label.strip_prefix(self.prefix.as_str()).unwrap_or("").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "f0389278-2413-4c9a-a44d-a4cfb9a2e7d3";

    #[test]
    fn test_round_trip() {
        let resolver = HostResolver::new("myenv");
        let name = resolver.resource_name(UUID);
        assert_eq!(name, format!("re-myenv-{}", UUID));

        let host = format!("{}.cluster.local", name);
        assert_eq!(resolver.extract_service_id(&host), UUID);
    }

    #[test]
    fn test_truncates_environment_not_id() {
        let long_env = "a".repeat(40);
        let resolver = HostResolver::new(&long_env);

        let name = resolver.resource_name(UUID);
        assert_eq!(name.len(), 63);
        assert!(name.ends_with(UUID), "ID suffix must be preserved in full");
        assert!(name.starts_with("re-aaa"));

        // Still round-trips through extraction.
        let host = format!("{}.svc.cluster.local", name);
        assert_eq!(resolver.extract_service_id(&host), UUID);
    }

    #[test]
    fn test_short_environment_untouched() {
        let resolver = HostResolver::new("ab");
        assert_eq!(resolver.prefix(), "re-ab-");
    }

    #[test]
    fn test_unknown_prefix_yields_empty_id() {
        let resolver = HostResolver::new("myenv");
        assert_eq!(resolver.extract_service_id("other-host.cluster.local"), "");
        assert_eq!(resolver.extract_service_id(""), "");
    }
}
