//! Request forwarding toward backend targets.
//!
//! # Responsibilities
//! - Build the forwarding transport with the shared TLS flags
//! - Rewrite the inbound URI onto the target (slash-aware path join,
//!   query concatenation)
//! - Copy headers, stripping hop-by-hop headers, Host and the
//!   caller-supplied Access-Token
//! - Issue the outbound call under the per-forward timeout
//!
//! # Design Decisions
//! - The forwarding client sends no default User-Agent, so a request
//!   without a client-set agent is forwarded without one instead of
//!   leaking a proxy default
//! - Redirects are never followed; the backend's redirect goes back to
//!   the caller verbatim

use std::time::Duration;

use axum::body::Bytes;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use axum::http::Method;
use url::Url;

use crate::auth::ACCESS_TOKEN_HEADER;
use crate::errors::AppError;
use crate::registry::RequestParameters;

/// Hop-by-hop headers that must not be forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Proxy-chain headers stamped by upstream ingress layers. The gateway
/// forwards as its own client, so these never reach the backend.
const FORWARDED_CHAIN: [&str; 4] = [
    "x-forwarded-for",
    "x-forwarded-proto",
    "x-forwarded-host",
    "x-forwarded-client-cert",
];

/// Build the transport used to forward requests to one backend.
pub fn build_forward_client(skip_verify: bool) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(skip_verify)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| AppError::Internal(format!("failed to build forward client: {}", e)))
}

/// Join two URL path segments with exactly one slash between them.
pub fn join_paths(base: &str, path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return base.trim_end_matches('/').to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), trimmed)
}

/// Rewrite the inbound path and query onto the target base URL.
pub fn build_target_url(target: &Url, path: &str, query: Option<&str>) -> Url {
    let mut url = target.clone();
    url.set_path(&join_paths(target.path(), path));

    let combined = match (target.query(), query) {
        (Some(t), Some(q)) if !t.is_empty() && !q.is_empty() => Some(format!("{}&{}", t, q)),
        (Some(t), _) if !t.is_empty() => Some(t.to_string()),
        (_, Some(q)) if !q.is_empty() => Some(q.to_string()),
        _ => None,
    };
    url.set_query(combined.as_deref());

    url
}

/// Copy inbound headers for forwarding.
///
/// Strips hop-by-hop headers, the upstream proxy chain and Host
/// (reqwest derives it from the target), and extracts the
/// caller-supplied Access-Token so it never reaches the backend.
pub fn prepare_headers(inbound: &HeaderMap) -> (HeaderMap, Option<HeaderValue>) {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    let mut external = None;

    for (name, value) in inbound.iter() {
        if name == HOST
            || HOP_BY_HOP.contains(&name.as_str())
            || FORWARDED_CHAIN.contains(&name.as_str())
        {
            continue;
        }
        if name.as_str() == ACCESS_TOKEN_HEADER {
            external = Some(value.clone());
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    (headers, external)
}

/// Append the service's fixed headers and query parameters onto the
/// forwarded request.
///
/// Runs before authorization is attached, so a declared Authorization
/// header never overrides the selected strategy. Entries that do not
/// form valid header names or values are skipped with a warning.
pub fn apply_request_parameters(
    params: &RequestParameters,
    headers: &mut HeaderMap,
    url: &mut Url,
) {
    for (name, values) in &params.headers {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            tracing::warn!(header = %name, "Skipping invalid metadata header name");
            continue;
        };
        for value in values {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.append(header_name.clone(), value);
                }
                Err(_) => {
                    tracing::warn!(header = %name, "Skipping invalid metadata header value");
                }
            }
        }
    }

    if params.query_parameters.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (name, values) in &params.query_parameters {
        for value in values {
            pairs.append_pair(name, value);
        }
    }
}

/// Copy backend response headers for the caller.
///
/// Hop-by-hop headers are dropped; the inbound server re-frames the
/// response itself.
pub fn copy_response_headers(backend: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(backend.len());
    for (name, value) in backend.iter() {
        if HOP_BY_HOP.contains(&name.as_str()) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Send one forwarded request under the per-forward timeout.
///
/// Transport failures stay `reqwest::Error`s; they are not part of the
/// structured error taxonomy and the dispatcher maps them to a plain
/// 502.
pub async fn send(
    client: &reqwest::Client,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
    timeout: Duration,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .request(method, url)
        .headers(headers)
        .body(body)
        .timeout(timeout)
        .send()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/a/", "/b"), "/a/b");
        assert_eq!(join_paths("/a", "b"), "/a/b");
        assert_eq!(join_paths("/a/", "b"), "/a/b");
        assert_eq!(join_paths("/a", "/b"), "/a/b");
        assert_eq!(join_paths("/a", ""), "/a");
        assert_eq!(join_paths("/", "/orders/123"), "/orders/123");
    }

    #[test]
    fn test_build_target_url_joins_path() {
        let target = Url::parse("http://backend:8000/base").unwrap();
        let url = build_target_url(&target, "/orders/123", None);
        assert_eq!(url.as_str(), "http://backend:8000/base/orders/123");
    }

    #[test]
    fn test_build_target_url_concatenates_queries() {
        let target = Url::parse("http://backend:8000/base?fixed=1").unwrap();
        let url = build_target_url(&target, "/orders", Some("page=2"));
        assert_eq!(url.query(), Some("fixed=1&page=2"));

        let plain = Url::parse("http://backend:8000").unwrap();
        let url = build_target_url(&plain, "/orders", Some("page=2"));
        assert_eq!(url.query(), Some("page=2"));

        let url = build_target_url(&plain, "/orders", None);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_build_target_url_preserves_encoded_path() {
        let target = Url::parse("http://backend:8000").unwrap();
        let url = build_target_url(&target, "/files/a%2Fb%20c", None);
        assert_eq!(url.path(), "/files/a%2Fb%20c");
    }

    #[test]
    fn test_apply_request_parameters() {
        let mut params = RequestParameters::default();
        params.headers.insert("X-Team".into(), vec!["ops".into()]);
        params
            .query_parameters
            .insert("api_key".into(), vec!["k1".into()]);

        let mut headers = HeaderMap::new();
        let mut url = Url::parse("http://backend:8000/data?page=2").unwrap();
        apply_request_parameters(&params, &mut headers, &mut url);

        assert_eq!(headers["x-team"], "ops");
        let query = url.query().unwrap();
        assert!(query.contains("page=2"));
        assert!(query.contains("api_key=k1"));
    }

    #[test]
    fn test_apply_request_parameters_skips_invalid_names() {
        let mut params = RequestParameters::default();
        params
            .headers
            .insert("bad name".into(), vec!["value".into()]);

        let mut headers = HeaderMap::new();
        let mut url = Url::parse("http://backend:8000").unwrap();
        apply_request_parameters(&params, &mut headers, &mut url);

        assert!(headers.is_empty());
    }

    #[test]
    fn test_prepare_headers_strips_forwarding_chain() {
        let mut inbound = HeaderMap::new();
        inbound.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        inbound.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        inbound.insert(
            "x-forwarded-host",
            HeaderValue::from_static("demo.example.com"),
        );
        inbound.insert("x-forwarded-client-cert", HeaderValue::from_static("cert"));
        inbound.insert("x-custom", HeaderValue::from_static("kept"));

        let (headers, _) = prepare_headers(&inbound);

        for name in FORWARDED_CHAIN {
            assert!(headers.get(name).is_none(), "{} must be stripped", name);
        }
        assert_eq!(headers["x-custom"], "kept");
    }

    #[test]
    fn test_prepare_headers_strips_and_extracts() {
        let mut inbound = HeaderMap::new();
        inbound.insert(HOST, HeaderValue::from_static("svc.cluster.local"));
        inbound.insert("connection", HeaderValue::from_static("keep-alive"));
        inbound.insert("access-token", HeaderValue::from_static("Bearer ext"));
        inbound.insert("x-custom", HeaderValue::from_static("kept"));

        let (headers, external) = prepare_headers(&inbound);

        assert!(headers.get(HOST).is_none());
        assert!(headers.get("connection").is_none());
        assert!(headers.get("access-token").is_none());
        assert_eq!(headers["x-custom"], "kept");
        assert_eq!(external.unwrap(), "Bearer ext");
    }
}
