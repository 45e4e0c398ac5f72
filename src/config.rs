//! Environment configuration and base URL resolution.
//!
//! The environment is read once at startup. [`resolve_base_url`] turns it into
//! the prefix every relative request path is joined onto:
//!
//! 1. An override that already carries `http://` / `https://` is used as-is.
//! 2. An override without a protocol gets `https://` in production builds and
//!    `http://` otherwise.
//! 3. No override in production: empty base URL (relative requests) plus an
//!    error-level diagnostic naming the missing variable.
//! 4. No override outside production: [`DEFAULT_DEV_API_URL`].
//!
//! A single trailing slash is stripped in cases 1 and 2.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::network::{API_URL_ENV, DEFAULT_DEV_API_URL, MODE_ENV};

// ============================================================================
// Build mode
// ============================================================================

/// Which kind of build the application is running as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Production,
    Development,
    /// Neither production nor development (test runners, previews).
    Test,
}

impl BuildMode {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Test => "test",
        }
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when `APP_MODE` holds something other than a known build mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown build mode: {0}")]
pub struct ParseBuildModeError(pub String);

impl FromStr for BuildMode {
    type Err = ParseBuildModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            other => Err(ParseBuildModeError(other.to_string())),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment inputs for the client, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Base URL override, trimmed. `None` when unset or blank.
    pub api_url: Option<String>,
    pub mode: BuildMode,
}

impl Environment {
    pub fn new(api_url: Option<&str>, mode: BuildMode) -> Self {
        Self {
            api_url: api_url.and_then(normalize_override),
            mode,
        }
    }

    /// Read `APP_API_URL` and `APP_MODE` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the same keys as [`Environment::from_env`] through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(MODE_ENV) {
            Some(raw) if !raw.trim().is_empty() => raw.parse().unwrap_or_else(|e| {
                let fallback = BuildMode::default();
                tracing::warn!("{}; falling back to {}", e, fallback);
                fallback
            }),
            _ => BuildMode::default(),
        };

        Self::new(lookup(API_URL_ENV).as_deref(), mode)
    }
}

fn normalize_override(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// Base URL resolution
// ============================================================================

/// Which precedence rule produced a [`BaseUrl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    /// Override already carried a protocol.
    Explicit,
    /// Override had no protocol; one was added based on the build mode.
    InferredScheme,
    /// No override in a production build. The URL is empty.
    MissingInProduction,
    /// No override outside production. The URL is the local dev address.
    DevelopmentDefault,
}

/// A resolved base URL. An empty `url` means "no override": requests resolve
/// relative to the page origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    pub url: String,
    pub source: BaseUrlSource,
}

impl BaseUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn is_relative(&self) -> bool {
        self.url.is_empty()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_relative() {
            f.write_str("(relative URLs)")
        } else {
            f.write_str(&self.url)
        }
    }
}

/// Resolve the base URL from `env`. See the module docs for the precedence.
pub fn resolve_base_url(env: &Environment) -> BaseUrl {
    let resolved = match env.api_url.as_deref().and_then(normalize_override) {
        Some(raw) if has_protocol(&raw) => BaseUrl {
            url: strip_trailing_slash(&raw).to_string(),
            source: BaseUrlSource::Explicit,
        },
        Some(raw) => {
            let scheme = if env.mode.is_production() {
                "https://"
            } else {
                "http://"
            };
            BaseUrl {
                url: format!("{}{}", scheme, strip_trailing_slash(&raw)),
                source: BaseUrlSource::InferredScheme,
            }
        }
        None if env.mode.is_production() => {
            tracing::error!(
                "{} is not set for this production build; falling back to relative URLs. \
                 Cross-origin API requests will fail until {} is configured.",
                API_URL_ENV,
                API_URL_ENV
            );
            BaseUrl {
                url: String::new(),
                source: BaseUrlSource::MissingInProduction,
            }
        }
        None => BaseUrl {
            url: DEFAULT_DEV_API_URL.to_string(),
            source: BaseUrlSource::DevelopmentDefault,
        },
    };

    if env.mode.is_development() {
        tracing::info!("API base URL: {}", resolved);
    }

    resolved
}

fn has_protocol(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
