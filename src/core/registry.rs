//! Destination registry, health tracking, and fan-out routing
//!
//! Holds the ordered list of registered destinations plus the optional
//! fallback, with one health flag per slot. Health never gates normal
//! delivery; it only decides whether the fallback also receives the
//! envelope. The tracker never infers health from delivery failures.

use super::attrs::AttrSet;
use super::destination::{Destination, HealthFlag};
use super::error::{LogError, Result};
use super::level::Level;
use super::metrics::PipelineMetrics;

struct Slot {
    destination: Box<dyn Destination>,
    health: HealthFlag,
}

impl Slot {
    fn attach(mut destination: Box<dyn Destination>) -> Self {
        let health = HealthFlag::default();
        destination.attach(health.clone());
        Self {
            destination,
            health,
        }
    }
}

#[derive(Default)]
pub struct DestinationRegistry {
    slots: Vec<Slot>,
    fallback: Option<Slot>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            fallback: None,
        }
    }

    /// Register a destination at the end of the dispatch order.
    ///
    /// Runs the init hook first; if init fails the registration is rejected,
    /// the error is returned, and the registry is left unchanged.
    pub fn register(&mut self, mut destination: Box<dyn Destination>) -> Result<()> {
        destination.init().map_err(|e| {
            LogError::init_failed(destination.name().to_string(), e.to_string())
        })?;
        self.slots.push(Slot::attach(destination));
        Ok(())
    }

    /// Install or replace the fallback destination.
    ///
    /// The new destination is initialized first; on init failure the
    /// previous fallback is left untouched and still initialized. Only
    /// after a successful init is the old fallback shut down; a shutdown
    /// failure surfaces to the caller while the new fallback stays
    /// installed.
    pub fn set_fallback(&mut self, mut destination: Box<dyn Destination>) -> Result<()> {
        destination.init().map_err(|e| {
            LogError::init_failed(destination.name().to_string(), e.to_string())
        })?;

        let previous = self.fallback.replace(Slot::attach(destination));
        if let Some(mut old) = previous {
            old.destination.shutdown().map_err(|e| {
                LogError::shutdown_failed(old.destination.name().to_string(), e.to_string())
            })?;
        }
        Ok(())
    }

    /// Remove a destination by name, running its shutdown hook.
    ///
    /// The slot is removed either way; a shutdown failure is returned and
    /// the destination is left in whatever state the attempt produced.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let idx = self
            .slots
            .iter()
            .position(|s| s.destination.name() == name)
            .ok_or_else(|| LogError::DestinationNotFound {
                name: name.to_string(),
            })?;

        let mut slot = self.slots.remove(idx);
        slot.destination.shutdown().map_err(|e| {
            LogError::shutdown_failed(name.to_string(), e.to_string())
        })
    }

    /// Toggle the health flag of a named primary destination
    pub fn set_healthy(&self, name: &str, healthy: bool) -> Result<()> {
        let slot = self
            .slots
            .iter()
            .find(|s| s.destination.name() == name)
            .ok_or_else(|| LogError::DestinationNotFound {
                name: name.to_string(),
            })?;
        slot.health.set(healthy);
        Ok(())
    }

    pub fn is_healthy(&self, name: &str) -> Result<bool> {
        let slot = self
            .slots
            .iter()
            .find(|s| s.destination.name() == name)
            .ok_or_else(|| LogError::DestinationNotFound {
                name: name.to_string(),
            })?;
        Ok(slot.health.get())
    }

    /// Health handle for a named primary, for wiring external monitors
    pub fn health_flag(&self, name: &str) -> Option<HealthFlag> {
        self.slots
            .iter()
            .find(|s| s.destination.name() == name)
            .map(|s| s.health.clone())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|s| s.destination.name().to_string())
            .collect()
    }

    fn any_unhealthy(&self) -> bool {
        self.slots.iter().any(|s| !s.health.get())
    }

    /// Fan one envelope out per the routing rule.
    ///
    /// Every primary receives the envelope in registration order regardless
    /// of health. Health is read only after all primary attempts: the
    /// fallback then receives the same envelope iff a fallback is set and
    /// at least one primary is currently unhealthy, or no primaries are
    /// registered at all. A destination that flags itself unhealthy from
    /// inside `send` therefore gets that very envelope compensated. Send
    /// failures are counted and reported once to stderr, never propagated;
    /// only health flags communicate persistent trouble.
    pub fn route(
        &mut self,
        level: Level,
        attrs: &AttrSet,
        message: &str,
        metrics: &PipelineMetrics,
    ) {
        for slot in &mut self.slots {
            if let Err(e) = slot.destination.send(level, attrs, message) {
                metrics.record_send_failure();
                eprintln!(
                    "[FANLOG ERROR] destination '{}' send failed: {}",
                    slot.destination.name(),
                    e
                );
            }
        }

        let use_fallback = self.fallback.is_some() && (self.slots.is_empty() || self.any_unhealthy());

        if use_fallback {
            if let Some(slot) = self.fallback.as_mut() {
                match slot.destination.send(level, attrs, message) {
                    Ok(()) => {
                        metrics.record_fallback_delivery();
                    }
                    Err(e) => {
                        metrics.record_send_failure();
                        eprintln!(
                            "[FANLOG ERROR] fallback '{}' send failed: {}",
                            slot.destination.name(),
                            e
                        );
                    }
                }
            }
        }
    }

    /// Shut down every destination including the fallback, collecting the
    /// first error while still attempting the rest
    pub fn shutdown_all(&mut self) -> Result<()> {
        let mut first_err = None;

        for slot in &mut self.slots {
            if let Err(e) = slot.destination.shutdown() {
                let err =
                    LogError::shutdown_failed(slot.destination.name().to_string(), e.to_string());
                first_err.get_or_insert(err);
            }
        }
        self.slots.clear();

        if let Some(mut slot) = self.fallback.take() {
            if let Err(e) = slot.destination.shutdown() {
                let err =
                    LogError::shutdown_failed(slot.destination.name().to_string(), e.to_string());
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::MemoryDestination;

    fn registry_with_memory(name: &str) -> (DestinationRegistry, crate::destinations::MemoryHandle) {
        let mut registry = DestinationRegistry::new();
        let dest = MemoryDestination::new(name);
        let handle = dest.handle();
        registry.register(Box::new(dest)).expect("register");
        (registry, handle)
    }

    struct RefusingDestination;

    impl Destination for RefusingDestination {
        fn name(&self) -> &str {
            "refusing"
        }
        fn init(&mut self) -> Result<()> {
            Err(LogError::other("no backend available"))
        }
        fn shutdown(&mut self) -> Result<()> {
            Ok(())
        }
        fn is_initialized(&self) -> bool {
            false
        }
        fn send(&mut self, _level: Level, _attrs: &AttrSet, _message: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_runs_init() {
        let (registry, handle) = registry_with_memory("mem");
        assert_eq!(registry.len(), 1);
        assert!(handle.is_initialized());
    }

    #[test]
    fn test_register_init_failure_leaves_registry_unchanged() {
        let mut registry = DestinationRegistry::new();
        let err = registry.register(Box::new(RefusingDestination)).unwrap_err();

        assert!(matches!(err, LogError::InitFailed { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_fallback_replace_init_failure_keeps_previous() {
        let mut registry = DestinationRegistry::new();
        let prior = MemoryDestination::new("prior-fallback");
        let prior_handle = prior.handle();
        registry.set_fallback(Box::new(prior)).expect("set fallback");

        let err = registry.set_fallback(Box::new(RefusingDestination)).unwrap_err();
        assert!(matches!(err, LogError::InitFailed { .. }));

        // The prior fallback is untouched and still initialized
        assert!(registry.has_fallback());
        assert!(prior_handle.is_initialized());
    }

    #[test]
    fn test_fallback_replace_shuts_down_previous() {
        let mut registry = DestinationRegistry::new();
        let prior = MemoryDestination::new("prior");
        let prior_handle = prior.handle();
        registry.set_fallback(Box::new(prior)).expect("set fallback");

        registry
            .set_fallback(Box::new(MemoryDestination::new("next")))
            .expect("replace fallback");

        assert!(!prior_handle.is_initialized());
    }

    #[test]
    fn test_remove_runs_shutdown() {
        let (mut registry, handle) = registry_with_memory("mem");
        registry.remove("mem").expect("remove");
        assert!(registry.is_empty());
        assert!(!handle.is_initialized());
    }

    #[test]
    fn test_remove_unknown_name() {
        let mut registry = DestinationRegistry::new();
        let err = registry.remove("ghost").unwrap_err();
        assert!(matches!(err, LogError::DestinationNotFound { .. }));
    }

    #[test]
    fn test_route_ignores_health_for_primaries() {
        let (mut registry, handle) = registry_with_memory("mem");
        registry.set_healthy("mem", false).expect("set unhealthy");

        let metrics = PipelineMetrics::new();
        registry.route(Level::Info, &AttrSet::new(), "still delivered", &metrics);

        assert_eq!(handle.records().len(), 1);
    }

    #[test]
    fn test_route_fallback_on_unhealthy_primary() {
        let (mut registry, primary) = registry_with_memory("mem");
        let fallback = MemoryDestination::new("fallback");
        let fallback_handle = fallback.handle();
        registry.set_fallback(Box::new(fallback)).expect("set fallback");

        let metrics = PipelineMetrics::new();

        registry.route(Level::Info, &AttrSet::new(), "healthy", &metrics);
        assert_eq!(fallback_handle.records().len(), 0);

        registry.set_healthy("mem", false).expect("set unhealthy");
        registry.route(Level::Info, &AttrSet::new(), "degraded", &metrics);
        assert_eq!(primary.records().len(), 2);
        assert_eq!(fallback_handle.records().len(), 1);
        assert_eq!(metrics.fallback_deliveries(), 1);

        registry.set_healthy("mem", true).expect("set healthy");
        registry.route(Level::Info, &AttrSet::new(), "recovered", &metrics);
        assert_eq!(fallback_handle.records().len(), 1);
    }

    #[test]
    fn test_route_compensates_health_flipped_during_send() {
        /// Destination that reports trouble through its attached flag the
        /// moment it delivers
        struct FlippingDestination {
            health: Option<HealthFlag>,
            initialized: bool,
        }

        impl Destination for FlippingDestination {
            fn name(&self) -> &str {
                "flipping"
            }
            fn attach(&mut self, health: HealthFlag) {
                self.health = Some(health);
            }
            fn init(&mut self) -> Result<()> {
                self.initialized = true;
                Ok(())
            }
            fn shutdown(&mut self) -> Result<()> {
                Ok(())
            }
            fn is_initialized(&self) -> bool {
                self.initialized
            }
            fn send(&mut self, _level: Level, _attrs: &AttrSet, _message: &str) -> Result<()> {
                if let Some(health) = &self.health {
                    health.set(false);
                }
                Ok(())
            }
        }

        let mut registry = DestinationRegistry::new();
        registry
            .register(Box::new(FlippingDestination {
                health: None,
                initialized: false,
            }))
            .expect("register");
        let fallback = MemoryDestination::new("fallback");
        let fallback_handle = fallback.handle();
        registry.set_fallback(Box::new(fallback)).expect("set fallback");

        // Health is read after the primary attempts, so the envelope whose
        // delivery flipped the flag is itself compensated
        let metrics = PipelineMetrics::new();
        registry.route(Level::Error, &AttrSet::new(), "trigger", &metrics);

        assert!(!registry.is_healthy("flipping").expect("query"));
        assert_eq!(fallback_handle.messages(), vec!["trigger".to_string()]);
        assert_eq!(metrics.fallback_deliveries(), 1);
    }

    #[test]
    fn test_route_fallback_with_no_primaries() {
        let mut registry = DestinationRegistry::new();
        let fallback = MemoryDestination::new("fallback");
        let handle = fallback.handle();
        registry.set_fallback(Box::new(fallback)).expect("set fallback");

        let metrics = PipelineMetrics::new();
        registry.route(Level::Warning, &AttrSet::new(), "orphaned", &metrics);

        assert_eq!(handle.records().len(), 1);
    }

    #[test]
    fn test_shutdown_all_clears_everything() {
        let (mut registry, primary) = registry_with_memory("mem");
        let fallback = MemoryDestination::new("fallback");
        let fallback_handle = fallback.handle();
        registry.set_fallback(Box::new(fallback)).expect("set fallback");

        registry.shutdown_all().expect("shutdown");
        assert!(registry.is_empty());
        assert!(!registry.has_fallback());
        assert!(!primary.is_initialized());
        assert!(!fallback_handle.is_initialized());
    }
}
