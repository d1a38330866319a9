//! In-memory destination
//!
//! Buffers delivered records for later inspection. The `MemoryHandle`
//! returned by [`MemoryDestination::handle`] stays valid after the
//! destination itself is boxed into a registry, and tolerates concurrent
//! reads while the dispatcher appends.

use crate::core::{AttrSet, Destination, HealthFlag, Level, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One delivered message as observed by the destination
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    pub level: Level,
    pub attrs: AttrSet,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

struct Shared {
    records: RwLock<Vec<MemoryRecord>>,
    initialized: AtomicBool,
}

pub struct MemoryDestination {
    name: String,
    shared: Arc<Shared>,
    health: Option<HealthFlag>,
}

impl MemoryDestination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(Shared {
                records: RwLock::new(Vec::new()),
                initialized: AtomicBool::new(false),
            }),
            health: None,
        }
    }

    /// Inspection handle that outlives registration
    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Destination for MemoryDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn attach(&mut self, health: HealthFlag) {
        self.health = Some(health);
    }

    fn init(&mut self) -> Result<()> {
        self.shared.initialized.store(true, Ordering::Release);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.shared.initialized.store(false, Ordering::Release);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::Acquire)
    }

    fn send(&mut self, level: Level, attrs: &AttrSet, message: &str) -> Result<()> {
        self.shared.records.write().push(MemoryRecord {
            level,
            attrs: attrs.clone(),
            message: message.to_string(),
            received_at: Utc::now(),
        });
        Ok(())
    }
}

/// Read-side view of a [`MemoryDestination`]
#[derive(Clone)]
pub struct MemoryHandle {
    shared: Arc<Shared>,
}

impl MemoryHandle {
    /// Snapshot of all records received so far
    pub fn records(&self) -> Vec<MemoryRecord> {
        self.shared.records.read().clone()
    }

    /// Just the rendered messages, in delivery order
    pub fn messages(&self) -> Vec<String> {
        self.shared
            .records
            .read()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shared.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.records.read().is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.shared.records.write().clear();
    }
}
