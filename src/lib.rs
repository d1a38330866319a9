//! # Fanlog
//!
//! A structured, multi-destination logging core with asynchronous fan-out
//! delivery, drop-oldest backpressure, and health-based fallback routing.
//!
//! ## Features
//!
//! - **Non-blocking producers**: logging never waits on destination I/O
//! - **Bounded delivery**: a ring-buffer queue with drop-oldest overflow
//!   and per-drop notifications
//! - **Fan-out with redundancy**: every destination receives every message
//!   in order; a fallback destination covers unhealthy primaries
//! - **Scoped attributes**: adapters bind extra attributes to a sub-logger
//!   without mutating shared state

pub mod core;
pub mod destinations;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        global, reset_global, set_global, Adapter, AttrSet, AttrValue, Clock, DeliveryQueue,
        Destination, DestinationRegistry, DropCallback, DropNotice, Envelope, HealthFlag, Level,
        LogError, Loggable, Logger, LoggerBuilder, MessageBody, PipelineMetrics, Result,
        DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    #[cfg(feature = "console")]
    pub use crate::destinations::ConsoleDestination;
    pub use crate::destinations::{MemoryDestination, MemoryHandle, MemoryRecord};
}

pub use crate::core::{
    global, reset_global, set_global, system_clock, Adapter, AttrSet, AttrValue, Clock,
    DeliveryQueue, Destination, DestinationRegistry, DropCallback, DropNotice, Envelope,
    HealthFlag, Level, LogError, Loggable, Logger, LoggerBuilder, MessageBody, PipelineMetrics,
    Result, DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
#[cfg(feature = "console")]
pub use destinations::ConsoleDestination;
pub use destinations::{MemoryDestination, MemoryHandle, MemoryRecord};
