//! Network constants for the shared client.

use std::time::Duration;

/// Base URL used when no override is configured outside production builds.
pub const DEFAULT_DEV_API_URL: &str = "http://localhost:4000/api";

/// Per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

/// Environment variable holding the base URL override.
pub const API_URL_ENV: &str = "APP_API_URL";

/// Environment variable selecting the build mode (`production`, `development`, `test`).
pub const MODE_ENV: &str = "APP_MODE";

/// Path the application navigates to when the session is invalidated.
pub const SESSION_REDIRECT_PATH: &str = "/";
