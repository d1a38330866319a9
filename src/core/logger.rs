//! Base logger and fan-out dispatcher
//!
//! The `Logger` owns the base attribute set, the bounded delivery queue,
//! the destination registry, and the single dispatcher thread that drains
//! the queue. Producers merge attributes and enqueue without ever touching
//! destination I/O; the dispatcher renders each envelope once and fans it
//! out per the registry's routing rule.

use super::attrs::{AttrSet, AttrValue};
use super::destination::Destination;
use super::envelope::{system_clock, Clock, Envelope, MessageBody};
use super::error::{LogError, Result};
use super::level::Level;
use super::metrics::PipelineMetrics;
use super::queue::{DeliveryQueue, DropCallback, DropNotice, DEFAULT_QUEUE_CAPACITY};
use super::registry::DestinationRegistry;
use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default timeout for draining the dispatcher on drop
///
/// For custom timeout control, call `shutdown()` explicitly instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Anything log calls can be forwarded to: the base logger or an adapter
/// wrapping one.
///
/// The leveled convenience surface comes in three variants per severity:
/// a plain message, a deferred-format message (positional `{}` template,
/// rendered at dispatch time), and a deferred-format message with extra
/// per-call attributes.
pub trait Loggable: Send + Sync {
    /// Forward one logging event toward the base.
    ///
    /// Adapters merge their own attribute set under `attrs` before
    /// forwarding; the base merges the result over its own set, stamps the
    /// envelope, and enqueues it. Rejects sentinel levels with
    /// [`LogError::UnknownLevel`].
    fn dispatch_event(&self, level: Level, body: MessageBody, attrs: Option<AttrSet>)
        -> Result<()>;

    /// Shut down destinations synchronously and terminate the process.
    ///
    /// Pending envelopes are flushed first; no logging is possible
    /// afterward.
    fn shutdown_and_exit(&self, code: i32) -> !;

    fn log(&self, level: Level, message: impl Into<String>) -> Result<()>
    where
        Self: Sized,
    {
        self.dispatch_event(level, MessageBody::rendered(message), None)
    }

    fn logf(&self, level: Level, template: impl Into<String>, args: Vec<AttrValue>) -> Result<()>
    where
        Self: Sized,
    {
        self.dispatch_event(level, MessageBody::template(template, args), None)
    }

    fn log_with(
        &self,
        level: Level,
        template: impl Into<String>,
        args: Vec<AttrValue>,
        attrs: AttrSet,
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.dispatch_event(level, MessageBody::template(template, args), Some(attrs))
    }

    fn debug(&self, message: impl Into<String>) -> Result<()>
    where
        Self: Sized,
    {
        self.log(Level::Debug, message)
    }

    fn debugf(&self, template: impl Into<String>, args: Vec<AttrValue>) -> Result<()>
    where
        Self: Sized,
    {
        self.logf(Level::Debug, template, args)
    }

    fn debug_with(
        &self,
        template: impl Into<String>,
        args: Vec<AttrValue>,
        attrs: AttrSet,
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.log_with(Level::Debug, template, args, attrs)
    }

    fn info(&self, message: impl Into<String>) -> Result<()>
    where
        Self: Sized,
    {
        self.log(Level::Info, message)
    }

    fn infof(&self, template: impl Into<String>, args: Vec<AttrValue>) -> Result<()>
    where
        Self: Sized,
    {
        self.logf(Level::Info, template, args)
    }

    fn info_with(
        &self,
        template: impl Into<String>,
        args: Vec<AttrValue>,
        attrs: AttrSet,
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.log_with(Level::Info, template, args, attrs)
    }

    fn warning(&self, message: impl Into<String>) -> Result<()>
    where
        Self: Sized,
    {
        self.log(Level::Warning, message)
    }

    fn warningf(&self, template: impl Into<String>, args: Vec<AttrValue>) -> Result<()>
    where
        Self: Sized,
    {
        self.logf(Level::Warning, template, args)
    }

    fn warning_with(
        &self,
        template: impl Into<String>,
        args: Vec<AttrValue>,
        attrs: AttrSet,
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.log_with(Level::Warning, template, args, attrs)
    }

    fn error(&self, message: impl Into<String>) -> Result<()>
    where
        Self: Sized,
    {
        self.log(Level::Error, message)
    }

    fn errorf(&self, template: impl Into<String>, args: Vec<AttrValue>) -> Result<()>
    where
        Self: Sized,
    {
        self.logf(Level::Error, template, args)
    }

    fn error_with(
        &self,
        template: impl Into<String>,
        args: Vec<AttrValue>,
        attrs: AttrSet,
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.log_with(Level::Error, template, args, attrs)
    }

    fn fatal(&self, message: impl Into<String>) -> Result<()>
    where
        Self: Sized,
    {
        self.log(Level::Fatal, message)
    }

    fn fatalf(&self, template: impl Into<String>, args: Vec<AttrValue>) -> Result<()>
    where
        Self: Sized,
    {
        self.logf(Level::Fatal, template, args)
    }

    fn fatal_with(
        &self,
        template: impl Into<String>,
        args: Vec<AttrValue>,
        attrs: AttrSet,
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.log_with(Level::Fatal, template, args, attrs)
    }

    /// Log at the highest severity, then shut down and exit.
    fn fatal_exit(&self, message: impl Into<String>, code: i32) -> !
    where
        Self: Sized,
    {
        let _ = self.log(Level::Fatal, message);
        self.shutdown_and_exit(code)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

pub struct Logger {
    attrs: Arc<RwLock<AttrSet>>,
    queue: Arc<DeliveryQueue>,
    registry: Arc<RwLock<DestinationRegistry>>,
    metrics: Arc<PipelineMetrics>,
    clock: Clock,
    on_drop: Option<DropCallback>,
    drop_tx: Option<Sender<DropNotice>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Logger {
    /// Create a logger with default capacity and no destinations
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(
            DEFAULT_QUEUE_CAPACITY,
            AttrSet::new(),
            system_clock(),
            None,
            None,
        )
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn assemble(
        capacity: usize,
        attrs: AttrSet,
        clock: Clock,
        on_drop: Option<DropCallback>,
        drop_tx: Option<Sender<DropNotice>>,
    ) -> Self {
        let queue = Arc::new(DeliveryQueue::new(capacity));
        let registry = Arc::new(RwLock::new(DestinationRegistry::new()));
        let metrics = Arc::new(PipelineMetrics::new());

        let worker_queue = Arc::clone(&queue);
        let worker_registry = Arc::clone(&registry);
        let worker_metrics = Arc::clone(&metrics);

        let handle = thread::spawn(move || {
            while let Some(envelope) = worker_queue.pop() {
                // Render once per envelope, then fan out sequentially in
                // registration order
                let message = envelope.render();
                {
                    let mut registry = worker_registry.write();
                    registry.route(envelope.level, &envelope.attrs, &message, &worker_metrics);
                }
                worker_metrics.record_delivered();
                worker_queue.complete();
            }
            worker_queue.mark_finished();
        });

        Self {
            attrs: Arc::new(RwLock::new(attrs)),
            queue,
            registry,
            metrics,
            clock,
            on_drop,
            drop_tx,
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Register a destination at the end of the dispatch order.
    ///
    /// Runs the destination's init hook; on failure the registration is
    /// rejected and the error returned, with the registry unchanged.
    pub fn register_destination(&self, destination: Box<dyn Destination>) -> Result<()> {
        self.registry.write().register(destination)
    }

    /// Install or replace the fallback destination (see
    /// [`DestinationRegistry::set_fallback`] for the replacement contract)
    pub fn set_fallback(&self, destination: Box<dyn Destination>) -> Result<()> {
        self.registry.write().set_fallback(destination)
    }

    /// Remove a destination by name, running its shutdown hook
    pub fn remove_destination(&self, name: &str) -> Result<()> {
        self.registry.write().remove(name)
    }

    /// Explicit health setter for a registered destination
    pub fn set_destination_healthy(&self, name: &str, healthy: bool) -> Result<()> {
        self.registry.read().set_healthy(name, healthy)
    }

    pub fn is_destination_healthy(&self, name: &str) -> Result<bool> {
        self.registry.read().is_healthy(name)
    }

    pub fn destination_names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    /// Set a base attribute visible to every message logged afterward
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

    /// Snapshot of the base attribute set
    pub fn attrs(&self) -> AttrSet {
        self.attrs.read().clone()
    }

    /// Block until every enqueued envelope has completed dispatch
    pub fn flush(&self) {
        self.queue.flush();
    }

    /// Current number of queued (not yet drained) envelopes
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    fn notify_drop(&self, evicted: &Envelope) {
        if self.on_drop.is_none() && self.drop_tx.is_none() {
            return;
        }
        let notice = DropNotice::from_envelope(evicted);
        if let Some(callback) = &self.on_drop {
            callback(&notice);
        }
        if let Some(tx) = &self.drop_tx {
            // Best effort: a saturated notification sink loses the notice
            // rather than cascading
            let _ = tx.try_send(notice);
        }
    }

    fn join_worker(&self, timeout: Duration) -> bool {
        let handle = self.worker.lock().take();
        let Some(handle) = handle else {
            return true;
        };

        let start = std::time::Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[FANLOG ERROR] dispatcher panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }
            if start.elapsed() >= timeout {
                eprintln!(
                    "[FANLOG WARNING] dispatcher did not finish within {:?}. \
                     Some logs may be lost.",
                    timeout
                );
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Gracefully stop the pipeline.
    ///
    /// Signals the dispatcher to stop once the queue drains, waits up to
    /// `timeout` for it, then shuts down every destination. Returns `true`
    /// if the dispatcher drained in time and all shutdown hooks succeeded.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.queue.close();
        let drained = self.join_worker(timeout);

        let mut clean = drained;
        if let Err(e) = self.registry.write().shutdown_all() {
            eprintln!("[FANLOG ERROR] destination shutdown failed: {}", e);
            clean = false;
        }
        clean
    }
}

impl Loggable for Logger {
    fn dispatch_event(
        &self,
        level: Level,
        body: MessageBody,
        attrs: Option<AttrSet>,
    ) -> Result<()> {
        if !level.is_loggable() {
            return Err(LogError::UnknownLevel(level));
        }

        // Hold the base set only long enough to snapshot it; the envelope
        // owns an independent merged copy from here on
        let merged = {
            let base = self.attrs.read();
            match attrs {
                Some(call) => base.merged(&call),
                None => base.clone(),
            }
        };

        let envelope = Envelope::new(level, (self.clock)(), body, merged);
        if let Some(evicted) = self.queue.enqueue(envelope) {
            self.metrics.record_dropped();
            self.notify_drop(&evicted);
        }
        self.metrics.record_enqueued();
        Ok(())
    }

    fn shutdown_and_exit(&self, code: i32) -> ! {
        self.queue.flush();
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        std::process::exit(code)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.queue.close();
        self.join_worker(DEFAULT_SHUTDOWN_TIMEOUT);

        if let Err(e) = self.registry.write().shutdown_all() {
            eprintln!("[FANLOG ERROR] destination shutdown failed: {}", e);
        }

        let dropped = self.metrics.dropped();
        if dropped > 0 {
            eprintln!(
                "[FANLOG WARNING] pipeline shut down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use fanlog::prelude::*;
///
/// let logger = Logger::builder()
///     .capacity(500)
///     .attr("service", "api-gateway")
///     .destination(MemoryDestination::new("sink"))
///     .build()
///     .expect("valid configuration");
/// logger.info("ready").unwrap();
/// ```
pub struct LoggerBuilder {
    capacity: usize,
    attrs: AttrSet,
    clock: Clock,
    on_drop: Option<DropCallback>,
    drop_tx: Option<Sender<DropNotice>>,
    destinations: Vec<Box<dyn Destination>>,
    fallback: Option<Box<dyn Destination>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            attrs: AttrSet::new(),
            clock: system_clock(),
            on_drop: None,
            drop_tx: None,
            destinations: Vec::new(),
            fallback: None,
        }
    }

    /// Set the delivery queue capacity (must be positive)
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Add one base attribute
    #[must_use = "builder methods return a new value"]
    pub fn attr<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.attrs.set(key, value);
        self
    }

    /// Replace the base attribute set wholesale
    #[must_use = "builder methods return a new value"]
    pub fn attrs(mut self, attrs: AttrSet) -> Self {
        self.attrs = attrs;
        self
    }

    /// Override the clock used to stamp envelopes (replay/testing)
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Callback invoked once per envelope evicted by the overflow policy
    #[must_use = "builder methods return a new value"]
    pub fn on_drop(mut self, callback: DropCallback) -> Self {
        self.on_drop = Some(callback);
        self
    }

    /// Channel fed best-effort with one notice per evicted envelope
    #[must_use = "builder methods return a new value"]
    pub fn drop_channel(mut self, sender: Sender<DropNotice>) -> Self {
        self.drop_tx = Some(sender);
        self
    }

    /// Add a destination, registered in call order at build time
    #[must_use = "builder methods return a new value"]
    pub fn destination<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.destinations.push(Box::new(destination));
        self
    }

    /// Set the fallback destination
    #[must_use = "builder methods return a new value"]
    pub fn fallback<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.fallback = Some(Box::new(destination));
        self
    }

    /// Build the logger, initializing destinations in registration order.
    ///
    /// Fails on a zero capacity or on the first destination whose init
    /// hook fails.
    pub fn build(self) -> Result<Logger> {
        if self.capacity == 0 {
            return Err(LogError::config(
                "DeliveryQueue",
                "capacity must be a positive integer",
            ));
        }

        let logger = Logger::assemble(
            self.capacity,
            self.attrs,
            self.clock,
            self.on_drop,
            self.drop_tx,
        );

        for destination in self.destinations {
            logger.register_destination(destination)?;
        }
        if let Some(fallback) = self.fallback {
            logger.set_fallback(fallback)?;
        }

        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
