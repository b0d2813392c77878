//! Authorization strategy family.
//!
//! # Responsibilities
//! - Attach the correct Authorization header per credential kind
//! - Invalidate cached credential state on auth failures
//! - Select the strategy once per backend entry from the descriptor
//!
//! # Design Decisions
//! - Tagged enum with one dispatch point per operation instead of a
//!   trait object; the variant set is closed
//! - The token itself lives in the shared token cache keyed by client
//!   ID, so strategies stay stateless and instances for the same
//!   client share one token
//! - Every strategy is wrapped so a caller-supplied Access-Token
//!   bypasses gateway-managed credentials for that single request

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::auth::oauth::TokenFetcher;
use crate::auth::token_cache::TokenCache;
use crate::errors::AppError;
use crate::observability::metrics;
use crate::registry::lookup::SecretLookup;
use crate::registry::model::{CredentialDescriptor, CredentialKind};

/// Inbound header carrying a caller-supplied bearer token.
pub const ACCESS_TOKEN_HEADER: &str = "access-token";

/// Authorization strategy attached to one backend entry.
pub enum AuthStrategy {
    /// No authorization header.
    None,

    /// Static `Authorization: Basic ...` credentials.
    Basic { username: String, password: String },

    /// OAuth2 client-credentials, token shared through the cache.
    OAuth {
        client_id: String,
        client_secret: String,
        auth_url: String,
        cache: TokenCache,
        fetcher: Arc<TokenFetcher>,
    },

    /// Prefers a caller-supplied token over the wrapped strategy.
    ExternalToken(Box<AuthStrategy>),
}

impl AuthStrategy {
    /// Set the Authorization header on the outbound header map.
    ///
    /// `external` is the caller-supplied Access-Token value, already
    /// stripped from the forwarded headers by the dispatcher.
    pub async fn attach(
        &self,
        external: Option<&HeaderValue>,
        headers: &mut HeaderMap,
    ) -> Result<(), AppError> {
        match self {
            AuthStrategy::None => Ok(()),

            AuthStrategy::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{}:{}", username, password));
                headers.insert(AUTHORIZATION, header_value(format!("Basic {}", encoded))?);
                Ok(())
            }

            AuthStrategy::OAuth {
                client_id,
                client_secret,
                auth_url,
                cache,
                fetcher,
            } => {
                let token = match cache.get(client_id) {
                    Some(token) => {
                        metrics::record_token_cache_hit();
                        token
                    }
                    None => {
                        metrics::record_token_cache_miss();
                        let (token, expires_in) =
                            fetcher.fetch(client_id, client_secret, auth_url).await?;
                        cache.put(client_id, &token, expires_in);
                        token
                    }
                };
                headers.insert(AUTHORIZATION, header_value(format!("Bearer {}", token))?);
                Ok(())
            }

            AuthStrategy::ExternalToken(inner) => match external {
                Some(value) if !value.is_empty() => {
                    headers.insert(AUTHORIZATION, value.clone());
                    Ok(())
                }
                _ => Box::pin(inner.attach(external, headers)).await,
            },
        }
    }

    /// Drop cached credential state. No-op for static variants.
    pub fn invalidate(&self) {
        match self {
            AuthStrategy::OAuth {
                client_id, cache, ..
            } => cache.remove(client_id),
            AuthStrategy::ExternalToken(inner) => inner.invalidate(),
            _ => {}
        }
    }
}

fn header_value(value: String) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&value)
        .map_err(|e| AppError::Internal(format!("invalid authorization header value: {}", e)))
}

/// Build the strategy for a credential descriptor.
///
/// Runs once per backend entry creation; the result is cached with the
/// entry and never re-selected per request.
pub async fn build_strategy(
    credentials: Option<&CredentialDescriptor>,
    secrets: &dyn SecretLookup,
    cache: &TokenCache,
    fetcher: &Arc<TokenFetcher>,
) -> Result<AuthStrategy, AppError> {
    let inner = match credentials {
        None => AuthStrategy::None,
        Some(desc) => match desc.kind {
            CredentialKind::None => AuthStrategy::None,

            CredentialKind::Basic => {
                let secret_ref = require_secret_ref(desc)?;
                let secret = secrets.secret(secret_ref).await?;
                AuthStrategy::Basic {
                    username: secret.client_id,
                    password: secret.client_secret,
                }
            }

            CredentialKind::Oauth => {
                let secret_ref = require_secret_ref(desc)?;
                let auth_url = desc.auth_url.as_deref().ok_or_else(|| {
                    AppError::WrongInput("oauth credentials missing auth_url".into())
                })?;
                let secret = secrets.secret(secret_ref).await?;
                AuthStrategy::OAuth {
                    client_id: secret.client_id,
                    client_secret: secret.client_secret,
                    auth_url: auth_url.to_string(),
                    cache: cache.clone(),
                    fetcher: fetcher.clone(),
                }
            }
        },
    };

    Ok(AuthStrategy::ExternalToken(Box::new(inner)))
}

fn require_secret_ref(desc: &CredentialDescriptor) -> Result<&str, AppError> {
    desc.secret_ref
        .as_deref()
        .ok_or_else(|| AppError::WrongInput("credentials missing secret_ref".into()))
}
