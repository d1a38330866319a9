//! Destination implementations

#[cfg(feature = "console")]
pub mod console;
pub mod memory;

#[cfg(feature = "console")]
pub use console::ConsoleDestination;
pub use memory::{MemoryDestination, MemoryHandle, MemoryRecord};

// Re-export the capability trait for convenience
pub use crate::core::Destination;
