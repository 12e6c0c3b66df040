//! REST client for the Fruit Mall backend.
//!
//! # Architecture
//!
//! - `reqwest` with a per-request timeout and JSON bodies
//! - Bearer token attached to every request once the member has signed in
//! - Product and category lookups cached in-memory via `moka`
//! - Non-2xx responses decoded from the backend's `{status, code, message, errors}` body
//!
//! Endpoint groups live in submodules as further `impl ApiClient` blocks.
//!
//! # Example
//!
//! ```rust,ignore
//! use fruit_mall_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//! let products = client.list_products().await?;
//! ```

mod auth;
mod cache;
mod cart;
mod catalog;
mod orders;
mod reviews;
pub mod types;
mod wishlist;

use std::collections::BTreeMap;
use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};
pub use types::*;

/// Maximum number of cached lookups.
const CACHE_CAPACITY: u64 = 1000;

/// Longest slice of an unparseable error body kept in the error message.
const ERROR_BODY_PREVIEW: usize = 200;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request.
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        field_errors: BTreeMap<String, String>,
    },

    /// The session token is missing, expired or revoked.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found. `message` is the backend's explanation, when the
    /// response carried one.
    #[error("Not found: {path}")]
    NotFound {
        path: String,
        message: Option<String>,
    },

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry endpoint paths.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether this error means the session is no longer valid.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Client for the Fruit Mall REST API.
///
/// Cheap to clone; clones share the connection pool and lookup cache but
/// each carries its own bearer token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<SecretString>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be a base or the HTTP client
    /// fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("fruit-mall/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
            token: None,
        })
    }

    /// Set or clear the bearer token sent with each request.
    pub fn set_token(&mut self, token: Option<SecretString>) {
        self.token = token;
    }

    /// Whether a bearer token is attached.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The base URL endpoint paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop every cached lookup.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Build the URL for an endpoint from its path segments.
    ///
    /// Segments are percent-encoded, so IDs and keywords never alter the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = send(self.request(Method::GET, url)).await?;
        decode(response).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().extend_pairs(query);
        let response = send(self.request(Method::GET, url)).await?;
        decode(response).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = send(self.request(method, url).json(body)).await?;
        decode(response).await
    }

    async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, segments, body).await
    }

    async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, segments, body).await
    }

    /// `PUT` without a request body, for state transitions like cancellation.
    async fn put_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = send(self.request(Method::PUT, url)).await?;
        decode(response).await
    }

    /// `PUT` with a JSON body whose response has no body.
    async fn put_no_content<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(segments)?;
        send(self.request(Method::PUT, url).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.endpoint(segments)?;
        send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

/// Send a request and turn non-success statuses into `ApiError`s.
async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_string();
    let text = response.text().await.unwrap_or_default();
    Err(error_from_response(status, &path, &text))
}

/// Decode a successful response body as JSON.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}

/// Map a non-success response onto an `ApiError`.
fn error_from_response(status: StatusCode, path: &str, text: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        debug!(path, "Backend rejected session token");
        return ApiError::Unauthorized;
    }

    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();

    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound {
            path: path.to_string(),
            message: body.message.filter(|m| !m.trim().is_empty()),
        };
    }

    let message = body.message.unwrap_or_else(|| {
        let preview: String = text.chars().take(ERROR_BODY_PREVIEW).collect();
        if preview.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        } else {
            preview
        }
    });

    tracing::warn!(
        status = %status,
        path,
        code = body.code.as_deref().unwrap_or(""),
        "Backend returned non-success status"
    );

    ApiError::Api {
        status: status.as_u16(),
        code: body.code,
        message,
        field_errors: body.errors.unwrap_or_default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: Url::parse(base).unwrap(),
            timeout: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(60),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let api = client("http://localhost:8080/api");
        assert_eq!(
            api.endpoint(&["fruits", "7"]).unwrap().as_str(),
            "http://localhost:8080/api/fruits/7"
        );

        let api = client("http://localhost:8080/api/");
        assert_eq!(
            api.endpoint(&["cart"]).unwrap().as_str(),
            "http://localhost:8080/api/cart"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let api = client("http://localhost:8080/api");
        assert_eq!(
            api.endpoint(&["fruits", "navel orange?"]).unwrap().as_str(),
            "http://localhost:8080/api/fruits/navel%20orange%3F"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = ApiConfig::new(Url::parse("mailto:shop@fruitmall.com").unwrap());
        let result = ApiClient::new(&config);
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_unauthorized_status() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, "/api/cart", "");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_not_found_keeps_backend_message() {
        let body = r#"{"status":404,"code":"FRUIT-001","message":"Fruit not found"}"#;
        let err = error_from_response(StatusCode::NOT_FOUND, "/api/fruits/9", body);
        assert_eq!(err.to_string(), "Not found: /api/fruits/9");
        assert!(matches!(
            err,
            ApiError::NotFound { message: Some(ref m), .. } if m == "Fruit not found"
        ));

        let err = error_from_response(StatusCode::NOT_FOUND, "/api/fruits/9", "");
        assert!(matches!(err, ApiError::NotFound { message: None, .. }));
    }

    #[test]
    fn test_validation_error_keeps_field_errors() {
        let body = r#"{"timestamp":"2024-01-01T00:00:00","status":400,"code":"COMMON-001",
            "message":"Invalid input","errors":{"email":"already registered"}}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, "/api/auth/register", body);
        match err {
            ApiError::Api {
                status,
                code,
                message,
                field_errors,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("COMMON-001"));
                assert_eq!(message, "Invalid input");
                assert_eq!(field_errors.len(), 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plain_text_error_body() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "/api/cart", "");
        assert_eq!(err.to_string(), "API error: 502 - Bad Gateway");

        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "/api/cart", "boom");
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }

    #[test]
    fn test_set_token() {
        let mut api = client("http://localhost:8080/api");
        assert!(!api.has_token());
        api.set_token(Some(SecretString::from("abc")));
        assert!(api.has_token());
    }
}
