//! Session invalidation hook.
//!
//! The client never navigates by itself. When a response marks the session
//! as invalidated it notifies the registered [`SessionListener`] and still
//! rejects the request with the [`NormalizedError`].

use crate::error::NormalizedError;

/// Notified once per request that fails with
/// [`FailureKind::SessionInvalidated`](crate::error::FailureKind::SessionInvalidated).
pub trait SessionListener: Send + Sync {
    fn on_session_invalidated(&self, error: &NormalizedError);
}

impl<F> SessionListener for F
where
    F: Fn(&NormalizedError) + Send + Sync,
{
    fn on_session_invalidated(&self, error: &NormalizedError) {
        self(error)
    }
}

/// Full-page navigation to the error's redirect path (browser only).
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserRedirect;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
impl SessionListener for BrowserRedirect {
    fn on_session_invalidated(&self, error: &NormalizedError) {
        let Some(path) = error.redirect_to() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            tracing::warn!("No window available, cannot redirect to {}", path);
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            tracing::error!("Redirect to {} failed: {:?}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_is_a_listener() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let listener: Arc<dyn SessionListener> = Arc::new(move |e: &NormalizedError| {
            assert_eq!(e.redirect_to(), Some("/"));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = NormalizedError {
            kind: FailureKind::SessionInvalidated,
            ..NormalizedError::network("unused")
        };
        listener.on_session_invalidated(&err);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
