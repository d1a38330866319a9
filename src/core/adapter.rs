//! Attribute-scoping log adapter
//!
//! An adapter wraps any `Loggable` target (the base, or another adapter)
//! with its own attribute set. Every call through the adapter merges that
//! set under the call's attributes and forwards to the target, which merges
//! again under its own layer. Mutating the adapter's attributes never
//! touches the wrapped target.

use super::attrs::{AttrSet, AttrValue};
use super::envelope::MessageBody;
use super::error::Result;
use super::level::Level;
use super::logger::Loggable;
use parking_lot::RwLock;
use std::sync::Arc;

/// A sub-logger binding extra attributes to every message logged through it
///
/// # Example
/// ```
/// use fanlog::prelude::*;
/// use std::sync::Arc;
///
/// let dest = MemoryDestination::new("sink");
/// let handle = dest.handle();
/// let logger = Arc::new(
///     Logger::builder().destination(dest).build().expect("build"),
/// );
///
/// let request_log = Adapter::new(logger.clone());
/// request_log.set_attr("request_id", "abc-123");
/// request_log.info("handling request").unwrap();
///
/// logger.flush();
/// assert!(handle.records()[0].attrs.contains("request_id"));
/// ```
pub struct Adapter {
    target: Arc<dyn Loggable>,
    attrs: RwLock<AttrSet>,
}

impl Adapter {
    pub fn new(target: Arc<dyn Loggable>) -> Self {
        Self {
            target,
            attrs: RwLock::new(AttrSet::new()),
        }
    }

    pub fn with_attrs(target: Arc<dyn Loggable>, attrs: AttrSet) -> Self {
        Self {
            target,
            attrs: RwLock::new(attrs),
        }
    }

    /// Set an attribute on this adapter only
    pub fn set_attr<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.attrs.write().set(key, value);
    }

    pub fn get_attr(&self, key: &str) -> Option<AttrValue> {
        self.attrs.read().get(key).cloned()
    }

    pub fn remove_attr(&self, key: &str) {
        self.attrs.write().remove(key);
    }

    pub fn clear_attrs(&self) {
        self.attrs.write().clear();
    }

    /// Snapshot of this adapter's own attribute set
    pub fn attrs(&self) -> AttrSet {
        self.attrs.read().clone()
    }
}

impl Loggable for Adapter {
    fn dispatch_event(
        &self,
        level: Level,
        body: MessageBody,
        attrs: Option<AttrSet>,
    ) -> Result<()> {
        // Adapter attributes sit under call-supplied ones; the target's own
        // layer is merged further down the chain
        let merged = {
            let own = self.attrs.read();
            match attrs {
                Some(call) => Some(own.merged(&call)),
                None if own.is_empty() => None,
                None => Some(own.clone()),
            }
        };
        self.target.dispatch_event(level, body, merged)
    }

    fn shutdown_and_exit(&self, code: i32) -> ! {
        self.target.shutdown_and_exit(code)
    }
}
