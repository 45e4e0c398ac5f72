//! HTTP client layer — `ApiClient`, failure interception, session hook.

pub mod client;
pub mod interceptor;
pub mod session;

pub use client::{ApiClient, ApiClientBuilder};
pub use interceptor::{normalize, FailedResponse, Failure};
pub use session::SessionListener;
