//! Core pipeline types and traits

pub mod adapter;
pub mod attrs;
pub mod destination;
pub mod envelope;
pub mod error;
pub mod global;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod queue;
pub mod registry;

pub use adapter::Adapter;
pub use attrs::{AttrSet, AttrValue};
pub use destination::{Destination, HealthFlag};
pub use envelope::{system_clock, Clock, Envelope, MessageBody};
pub use error::{LogError, Result};
pub use global::{global, reset_global, set_global};
pub use level::Level;
pub use logger::{Loggable, Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::PipelineMetrics;
pub use queue::{DeliveryQueue, DropCallback, DropNotice, DEFAULT_QUEUE_CAPACITY};
pub use registry::DestinationRegistry;
