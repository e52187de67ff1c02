//! Non-durable store for tests and scratch catalogs.

use super::{RecordStore, Snapshot, StoreResult};
use crate::model::Entity;

/// Keeps the last persisted snapshot in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore<E> {
    records: Vec<E>,
    persist_count: usize,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            persist_count: 0,
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `records` already stored.
    pub fn seeded(records: Vec<E>) -> Self {
        Self {
            records,
            persist_count: 0,
        }
    }

    /// Records written by the last flush.
    pub fn records(&self) -> &[E] {
        &self.records
    }

    /// Number of flushes seen so far.
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl<E: Entity> RecordStore<E> for MemoryStore<E> {
    fn load(&mut self) -> StoreResult<Vec<E>> {
        Ok(self.records.clone())
    }

    fn persist(&mut self, records: &Snapshot<E>) -> StoreResult<()> {
        self.records = records.values().cloned().collect();
        self.persist_count += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
