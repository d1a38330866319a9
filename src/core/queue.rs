//! Bounded delivery queue with drop-oldest overflow
//!
//! The producer side is non-blocking: `enqueue` takes a short-lived mutex on
//! the ring buffer and never waits on consumer progress or destination I/O.
//! At capacity the single oldest retained envelope is evicted to make room,
//! which is the drop-oldest policy a channel-based queue cannot express (the
//! producer has no access to a channel's head). The single consumer blocks
//! in `pop` and reports completion through `complete`, which is what lets
//! `flush` wait for full dispatch rather than mere queue emptiness.

use super::envelope::Envelope;
use super::level::Level;
use chrono::{DateTime, Utc};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;

/// Default queue capacity when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Fire-and-forget notification emitted once per dropped envelope
#[derive(Debug, Clone)]
pub struct DropNotice {
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl DropNotice {
    pub fn from_envelope(envelope: &Envelope) -> Self {
        Self {
            level: envelope.level,
            timestamp: envelope.timestamp,
            message: envelope.render(),
        }
    }
}

/// Callback invoked once per dropped envelope
pub type DropCallback = Arc<dyn Fn(&DropNotice) + Send + Sync>;

struct QueueState {
    buf: VecDeque<Envelope>,
    /// Envelopes popped by the consumer but not yet fully dispatched
    in_flight: usize,
    /// Producer-side stop signal; the consumer drains what remains
    closed: bool,
    /// Set by the consumer when its loop exits, releases flush waiters
    finished: bool,
}

pub struct DeliveryQueue {
    state: Mutex<QueueState>,
    /// Wakes the consumer when an envelope arrives or the queue closes
    ready: Condvar,
    /// Wakes flush waiters when the pipeline goes idle
    idle: Condvar,
    capacity: usize,
}

impl DeliveryQueue {
    /// Create a queue with the given capacity.
    ///
    /// Capacity must be positive; the builder validates this before
    /// construction.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "queue capacity must be positive");
        Self {
            state: Mutex::new(QueueState {
                buf: VecDeque::with_capacity(capacity),
                in_flight: 0,
                closed: false,
                finished: false,
            }),
            ready: Condvar::new(),
            idle: Condvar::new(),
            capacity,
        }
    }

    /// Append an envelope, evicting the oldest retained envelope when full.
    ///
    /// Never blocks beyond the buffer mutex. Returns the evicted envelope,
    /// if any, so the caller can emit exactly one drop notification per
    /// eviction outside the lock. Enqueues racing with shutdown are
    /// accepted but not guaranteed delivery.
    pub fn enqueue(&self, envelope: Envelope) -> Option<Envelope> {
        let dropped = {
            let mut state = self.state.lock();
            let dropped = if state.buf.len() >= self.capacity {
                state.buf.pop_front()
            } else {
                None
            };
            state.buf.push_back(envelope);
            dropped
        };
        self.ready.notify_one();
        dropped
    }

    /// Take the next envelope, blocking until one arrives.
    ///
    /// Returns `None` once the queue is closed and drained. The popped
    /// envelope counts as in-flight until `complete` is called.
    pub fn pop(&self) -> Option<Envelope> {
        let mut state = self.state.lock();
        loop {
            if let Some(envelope) = state.buf.pop_front() {
                state.in_flight += 1;
                return Some(envelope);
            }
            if state.closed {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    /// Mark the most recently popped envelope as fully dispatched
    pub fn complete(&self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 && state.buf.is_empty() {
            drop(state);
            self.idle.notify_all();
        }
    }

    /// Block until the queue is empty and every drained envelope has
    /// completed dispatch.
    ///
    /// Also returns once the consumer loop has exited, so a flush racing
    /// with shutdown cannot hang on envelopes nobody will deliver.
    pub fn flush(&self) {
        let mut state = self.state.lock();
        while !(state.buf.is_empty() && state.in_flight == 0) && !state.finished {
            self.idle.wait(&mut state);
        }
    }

    /// Signal the consumer to stop once the queue drains
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.ready.notify_all();
    }

    /// Called by the consumer as its loop exits
    pub fn mark_finished(&self) {
        let mut state = self.state.lock();
        state.finished = true;
        drop(state);
        self.idle.notify_all();
    }

    /// Current number of buffered envelopes (excludes in-flight)
    pub fn len(&self) -> usize {
        self.state.lock().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
