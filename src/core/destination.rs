//! Destination capability contract
//!
//! A destination is an opaque output backend: it accepts a leveled message
//! with attributes, reports init/shutdown success, and reports health. Sends
//! arrive exclusively from the dispatcher thread, so implementations never
//! see concurrent `send` calls from this crate; a destination inspected
//! directly by the application (a test double, say) must tolerate concurrent
//! reads while the dispatcher writes.

use super::attrs::AttrSet;
use super::error::Result;
use super::level::Level;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared health flag for one registered destination.
///
/// Cloned handles all observe the same flag, so a destination's internal
/// monitor can report degraded state at any time without going through the
/// registry. Freshly registered destinations default to healthy; a
/// destination that knows better flips its flag from `attach`.
#[derive(Debug, Clone)]
pub struct HealthFlag(Arc<AtomicBool>);

impl HealthFlag {
    pub fn new(healthy: bool) -> Self {
        Self(Arc::new(AtomicBool::new(healthy)))
    }

    pub fn set(&self, healthy: bool) {
        self.0.store(healthy, Ordering::Relaxed);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for HealthFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

pub trait Destination: Send + Sync {
    /// Stable name used for registry lookups and error reports
    fn name(&self) -> &str;

    /// Called once at registration with the slot's health flag.
    ///
    /// The flag is the destination's callback path into the health tracker;
    /// how a destination determines its own health is its business.
    fn attach(&mut self, _health: HealthFlag) {}

    /// Prepare the destination for sends; must be safe to call more than once
    fn init(&mut self) -> Result<()>;

    /// Release resources; called on removal, replacement, and pipeline
    /// shutdown
    fn shutdown(&mut self) -> Result<()>;

    fn is_initialized(&self) -> bool;

    /// Deliver one rendered message with its merged attributes
    fn send(&mut self, level: Level, attrs: &AttrSet, message: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_flag_defaults_healthy() {
        let flag = HealthFlag::default();
        assert!(flag.get());
    }

    #[test]
    fn test_health_flag_shared_across_clones() {
        let flag = HealthFlag::new(true);
        let monitor_handle = flag.clone();

        monitor_handle.set(false);
        assert!(!flag.get());

        flag.set(true);
        assert!(monitor_handle.get());
    }
}
