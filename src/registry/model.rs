//! Service registry data model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Credential kind attached to a registered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    #[default]
    None,
    Basic,
    Oauth,
}

/// Credential descriptor for a registered service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CredentialDescriptor {
    /// How the gateway authenticates toward the backend.
    #[serde(default)]
    pub kind: CredentialKind,

    /// Name of the secret holding the credential material.
    #[serde(default)]
    pub secret_ref: Option<String>,

    /// Token endpoint URL for the oauth kind.
    #[serde(default)]
    pub auth_url: Option<String>,
}

/// Fixed headers and query parameters a service declares for every
/// forwarded request.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RequestParameters {
    /// Headers appended to the forwarded request.
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,

    /// Query parameters appended to the target URL.
    #[serde(default)]
    pub query_parameters: HashMap<String, Vec<String>>,
}

/// A registered backend service, as returned by the metadata lookup.
///
/// Immutable; fetched on cache miss and not stored beyond building the
/// backend entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceDescriptor {
    /// Opaque service ID, embedded in inbound host names.
    pub id: String,

    /// Base URL requests are forwarded to.
    pub target_url: String,

    /// Optional credential configuration.
    #[serde(default)]
    pub credentials: Option<CredentialDescriptor>,

    /// Optional fixed request parameters.
    #[serde(default)]
    pub request_parameters: Option<RequestParameters>,
}

/// Secret material resolved by reference name.
///
/// The Basic strategy reads the pair as username/password.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecretData {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Display for SecretData {
    /// Intentionally does not display the secret value.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:[REDACTED]", self.client_id)
    }
}
