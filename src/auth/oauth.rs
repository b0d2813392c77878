//! OAuth2 client-credentials token fetch.
//!
//! # Responsibilities
//! - Issue the form-encoded client-credentials grant
//! - Decode the issuer's token response
//! - Classify failures as upstream-call errors
//!
//! # Design Decisions
//! - Never retries internally; request-level retry is the retrier's job
//! - TLS verification toward the issuer follows the shared skip-verify
//!   flag (self-signed internal issuers)

use std::time::Duration;

use serde::Deserialize;

use crate::errors::AppError;
use crate::observability::metrics;

/// Token endpoint response for the client-credentials grant.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
}

/// Fetches bearer tokens from OAuth token endpoints.
#[derive(Clone)]
pub struct TokenFetcher {
    client: reqwest::Client,
}

impl TokenFetcher {
    /// Build a fetcher with the given per-call timeout.
    pub fn new(timeout: Duration, skip_verify: bool) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(skip_verify)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build token client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch a token, returning `(access_token, expires_in_secs)`.
    pub async fn fetch(
        &self,
        client_id: &str,
        client_secret: &str,
        auth_url: &str,
    ) -> Result<(String, u64), AppError> {
        let form = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ];

        metrics::record_token_fetch();

        let response = self
            .client
            .post(auth_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                AppError::UpstreamServerCallFailed(format!(
                    "token request to {} failed: {}",
                    auth_url, e
                ))
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::UpstreamServerCallFailed(format!(
                "token endpoint {} returned status {}",
                auth_url, status
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::UpstreamServerCallFailed(format!(
                "failed to decode token response from {}: {}",
                auth_url, e
            ))
        })?;

        tracing::debug!(auth_url = %auth_url, expires_in = token.expires_in, "Token fetched");

        Ok((token.access_token, token.expires_in))
    }
}
