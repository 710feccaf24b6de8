//! Late-bound selection callback.
//!
//! Markers are built once per reconciliation pass, but the host may swap its
//! selection handler on every re-render. Handlers therefore read the current
//! callback through a shared cell at click time instead of capturing one.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type SelectFn = dyn Fn(&str) + Send + Sync;

#[derive(Clone, Default)]
pub struct CallbackCell {
    inner: Arc<RwLock<Option<Arc<SelectFn>>>>,
}

impl CallbackCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current callback. Existing markers pick it up immediately.
    pub fn set<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(callback));
    }

    pub fn clear(&self) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    pub fn is_set(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Call whatever callback is current. Returns false if none is set.
    pub fn invoke(&self, id: &str) -> bool {
        // Release the lock before calling so the callback may replace itself.
        let current = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match current {
            Some(callback) => {
                callback(id);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for CallbackCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCell")
            .field("set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_invoke_reads_latest_callback() {
        let cell = CallbackCell::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handler = {
            let cell = cell.clone();
            move |id: &str| cell.invoke(id)
        };

        let log = seen.clone();
        cell.set(move |id| log.lock().unwrap().push(format!("first:{}", id)));
        handler("a");

        let log = seen.clone();
        cell.set(move |id| log.lock().unwrap().push(format!("second:{}", id)));
        handler("b");

        assert_eq!(*seen.lock().unwrap(), vec!["first:a", "second:b"]);
    }

    #[test]
    fn test_invoke_without_callback() {
        let cell = CallbackCell::new();
        assert!(!cell.invoke("x"));
        cell.set(|_| {});
        assert!(cell.invoke("x"));
        cell.clear();
        assert!(!cell.is_set());
    }

    #[test]
    fn test_callback_may_replace_itself() {
        let cell = CallbackCell::new();
        let inner = cell.clone();
        cell.set(move |_| inner.set(|_| {}));
        assert!(cell.invoke("x"));
        assert!(cell.invoke("y"));
    }
}
