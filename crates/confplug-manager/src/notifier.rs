//! Change notification hook.
//!
//! The coordinator calls [`ChangeNotifier::notify`] after every config
//! mutation: activation list append or removal, and option writes. The host
//! decides what a change means (write-through, batching, timers).

use std::sync::Arc;

/// A single callback invoked whenever plugin configuration changes.
///
/// The callback's return value is reported in debug logs; a `false` does not
/// roll anything back.
#[derive(Clone)]
pub struct ChangeNotifier {
    callback: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl ChangeNotifier {
    /// Create a notifier from a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// A notifier that does nothing and always reports success.
    pub fn noop() -> Self {
        Self::new(|| true)
    }

    /// Invoke the callback.
    pub fn notify(&self) -> bool {
        let accepted = (self.callback)();
        tracing::debug!(accepted, "Plugin configuration changed");
        accepted
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_is_noop_success() {
        assert!(ChangeNotifier::default().notify());
    }

    #[test]
    fn test_callback_invoked_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let notifier = ChangeNotifier::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        assert!(!notifier.notify());
        assert!(!notifier.clone().notify());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
