//! `ApiClient` — the shared, pre-configured HTTP client.
//!
//! Configuration is fixed at construction: base URL, credential policy,
//! timeout, default headers, session listener. Every failed request goes
//! through [`normalize`] exactly once and reaches the caller as a
//! [`NormalizedError`]. Nothing is retried.

use crate::config::{resolve_base_url, Environment};
use crate::error::{codes, BuildError, FailureKind, NormalizedError};
use crate::http::interceptor::{normalize, FailedResponse, Failure};
use crate::http::session::SessionListener;
use crate::network::{DEFAULT_DEV_API_URL, DEFAULT_TIMEOUT};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Shared HTTP client. Cheap to clone; clones share the connection pool.
pub struct ApiClient {
    base_url: String,
    client: Client,
    timeout: Duration,
    with_credentials: bool,
    session_listener: Option<Arc<dyn SessionListener>>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build from the process environment (`APP_API_URL`, `APP_MODE`).
    pub fn from_env() -> Result<Self, BuildError> {
        Self::from_environment(&Environment::from_env())
    }

    /// Build with the base URL resolved from `env` and default settings.
    pub fn from_environment(env: &Environment) -> Result<Self, BuildError> {
        let builder = Self::builder().environment(env);

        #[cfg(all(feature = "wasm", target_arch = "wasm32"))]
        let builder = builder.session_listener(crate::http::session::BrowserRedirect);

        builder.build()
    }

    /// Resolved base URL. Empty means requests are relative to the page origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether credentials travel with cross-origin requests.
    pub fn with_credentials(&self) -> bool {
        self.with_credentials
    }

    /// Join `path` onto the base URL.
    ///
    /// Absolute `http(s)://` paths are returned unchanged, as is any path
    /// when there is no base URL.
    pub fn url(&self, path: &str) -> String {
        if self.base_url.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    // ── Requests ─────────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, NormalizedError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, NormalizedError> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NormalizedError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NormalizedError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NormalizedError> {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, NormalizedError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// Start a request against `path` with the client's configuration applied.
    /// Finish it with [`ApiClient::send`].
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        #[allow(unused_mut)]
        let mut req = self.client.request(method, self.url(path));

        // Browser fetch: timeout and credential mode are per request.
        #[cfg(target_arch = "wasm32")]
        {
            req = req.timeout(self.timeout);
            if self.with_credentials {
                req = req.fetch_credentials_include();
            }
        }

        req
    }

    /// Send a request and decode a success body as JSON.
    ///
    /// An empty success body decodes as `null`, so `()` and `Option<_>` work.
    pub async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, NormalizedError> {
        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => return Err(self.reject(no_response(&e))),
        };

        let status = resp.status();
        let url = resp.url().to_string();

        if !status.is_success() {
            let body_text = match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        "Failed to read error response body from {}: {}",
                        url,
                        e
                    );
                    String::new()
                }
            };
            return Err(self.reject(Failure::Response(FailedResponse::from_text(
                status.as_u16(),
                &body_text,
                Some(url),
            ))));
        }

        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.reject(no_response(&e))),
        };
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

        serde_json::from_slice(body).map_err(|e| {
            tracing::warn!("Failed to decode response from {}: {}", url, e);
            NormalizedError {
                error_code: codes::INVALID_RESPONSE.to_string(),
                message: Some(format!("Failed to decode response: {}", e)),
                kind: FailureKind::Decode,
                status: Some(status.as_u16()),
                data: None,
                url: Some(url),
            }
        })
    }

    /// Normalize a failure and fire the session listener when applicable.
    fn reject(&self, failure: Failure) -> NormalizedError {
        let error = normalize(failure);
        if error.is_session_invalidated() {
            if let Some(listener) = &self.session_listener {
                listener.on_session_invalidated(&error);
            }
        }
        error
    }
}

fn no_response(e: &reqwest::Error) -> Failure {
    Failure::NoResponse {
        message: Some(e.to_string()),
        url: e.url().map(|u| u.to_string()),
    }
}

impl Clone for ApiClient {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            timeout: self.timeout,
            with_credentials: self.with_credentials,
            session_listener: self.session_listener.clone(),
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("with_credentials", &self.with_credentials)
            .field("session_listener", &self.session_listener.is_some())
            .finish()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    with_credentials: bool,
    headers: Vec<(String, String)>,
    session_listener: Option<Arc<dyn SessionListener>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DEV_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            with_credentials: true,
            headers: Vec::new(),
            session_listener: None,
        }
    }
}

impl ApiClientBuilder {
    /// Set the base URL as-is. An empty string means relative requests.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Set the base URL resolved from `env`.
    pub fn environment(self, env: &Environment) -> Self {
        let resolved = resolve_base_url(env);
        self.base_url(resolved.as_str())
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn session_listener(mut self, listener: impl SessionListener + 'static) -> Self {
        self.session_listener = Some(Arc::new(listener));
        self
    }

    pub fn build(self) -> Result<ApiClient, BuildError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &self.headers {
            let header_name =
                HeaderName::try_from(name.as_str()).map_err(|e| BuildError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| BuildError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            headers.insert(header_name, header_value);
        }

        let with_credentials = self.with_credentials && credentials_supported();
        if self.with_credentials && !with_credentials {
            tracing::warn!(
                "Credentials requested but this build has no cookie store; \
                 enable the `cookies` feature to send them"
            );
        }

        let mut builder = Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(self.timeout);
        }
        #[cfg(all(feature = "cookies", not(target_arch = "wasm32")))]
        {
            builder = builder.cookie_store(with_credentials);
        }

        Ok(ApiClient {
            base_url: self.base_url,
            client: builder.build()?,
            timeout: self.timeout,
            with_credentials,
            session_listener: self.session_listener,
        })
    }
}

/// Browsers attach credentials per request; native targets need the cookie jar.
fn credentials_supported() -> bool {
    cfg!(any(target_arch = "wasm32", feature = "cookies"))
}
