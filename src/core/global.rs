//! Process-scoped default logger
//!
//! A single lazily-constructed handle with explicit replace/reset for
//! tests; no other implicit static state exists in the crate.

use super::logger::Logger;
use parking_lot::RwLock;
use std::sync::Arc;

static GLOBAL: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// The process-wide default logger, constructed on first use with default
/// configuration (default capacity, no destinations).
pub fn global() -> Arc<Logger> {
    if let Some(logger) = GLOBAL.read().as_ref() {
        return Arc::clone(logger);
    }
    let mut guard = GLOBAL.write();
    Arc::clone(guard.get_or_insert_with(|| Arc::new(Logger::new())))
}

/// Replace the process-wide default, returning the previous one if any
pub fn set_global(logger: Arc<Logger>) -> Option<Arc<Logger>> {
    GLOBAL.write().replace(logger)
}

/// Clear the process-wide default; the next `global()` call rebuilds it.
/// Intended for tests.
pub fn reset_global() -> Option<Arc<Logger>> {
    GLOBAL.write().take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logger::Loggable;

    #[test]
    fn test_global_lazily_constructed_and_replaceable() {
        reset_global();

        let first = global();
        let second = global();
        assert!(Arc::ptr_eq(&first, &second));

        // Logging through the default works with no destinations
        first.info("into the void").unwrap();

        let replacement = Arc::new(Logger::new());
        let previous = set_global(Arc::clone(&replacement));
        assert!(previous.is_some());
        assert!(Arc::ptr_eq(&global(), &replacement));

        reset_global();
        assert!(!Arc::ptr_eq(&global(), &replacement));
        reset_global();
    }
}
