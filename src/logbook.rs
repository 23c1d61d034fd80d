//! In-memory store for user-authored log entries
//!
//! Holds food, medication, exercise and note entries for the session.
//! The remote-backed variant of these operations lives on `ApiClient`.
//! No validation happens here; callers check entries before submission.

use uuid::Uuid;

use crate::error::DashError;
use crate::model::{LogEntry, NewLogEntry};

/// Session-scoped collection of log entries, in insertion order.
/// Newest-first display ordering is the presentation layer's job.
#[derive(Debug, Default)]
pub struct MemoryLogbook {
    entries: Vec<LogEntry>,
}

#[allow(dead_code)]
impl MemoryLogbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, assigning it a fresh unique id
    pub fn add(&mut self, entry: NewLogEntry) -> LogEntry {
        let entry = LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: entry.timestamp,
            entry_type: entry.entry_type,
            value: entry.value,
            glucose_reading: entry.glucose_reading,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// All entries in insertion order
    pub fn list(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Remove the entry with the given id
    pub fn delete(&mut self, id: &str) -> Result<(), DashError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| DashError::NotFound(id.to_string()))?;
        self.entries.remove(pos);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
