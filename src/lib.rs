//! # app-http
//!
//! One shared, pre-configured HTTP client for an application, on native and
//! WASM targets.
//!
//! ## Architecture
//!
//! 1. **Core** — network constants, environment + base URL resolution, error
//!    types (always available, WASM-safe)
//! 2. **HTTP** — `ApiClient` with a single failure interception point that
//!    turns every failed request into a [`NormalizedError`](error::NormalizedError)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use app_http::prelude::*;
//!
//! let client = ApiClient::from_env()?;
//!
//! match client.get::<serde_json::Value>("/users/me").await {
//!     Ok(user) => println!("{user}"),
//!     Err(e) if e.error_code == codes::NETWORK_ERROR => eprintln!("offline"),
//!     Err(e) => eprintln!("{}", e.error_code),
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Network constants: defaults, environment variable names.
pub mod network;

/// Environment inputs and base URL resolution.
pub mod config;

/// Normalized request error and construction errors.
pub mod error;

// ── Layer 2: HTTP ────────────────────────────────────────────────────────────

/// HTTP client, failure interception, session hook.
#[cfg(feature = "http")]
pub mod http;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    pub use crate::config::{resolve_base_url, BaseUrl, BaseUrlSource, BuildMode, Environment};
    pub use crate::error::{codes, BuildError, FailureKind, NormalizedError};
    pub use crate::network::{DEFAULT_DEV_API_URL, DEFAULT_TIMEOUT};

    #[cfg(feature = "http")]
    pub use crate::http::{ApiClient, ApiClientBuilder, SessionListener};
}
