//! Canonical data model shared by the synthetic and remote paths
//!
//! A single `Reading` / `LogEntry` shape is used everywhere; remote
//! payloads are normalized into it once, at the data-access boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DashError;
use crate::units::{Status, Thresholds};

/// A glucose reading at a point in time
///
/// `status` is derived from `value` at construction and is never set
/// independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    /// Glucose value in mg/dL
    pub value: u16,
    pub status: Status,
}

impl Reading {
    /// Create a reading, classifying the value against the given thresholds
    pub fn new(timestamp: DateTime<Utc>, value: u16, thresholds: Thresholds) -> Self {
        Self {
            timestamp,
            value,
            status: thresholds.classify(value),
        }
    }
}

/// Summary metrics over a sequence of readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Mean value, rounded half away from zero
    pub average: u16,
    /// Percentage of readings classified Normal, 0-100
    pub time_in_range: u8,
    pub highest: u16,
    pub lowest: u16,
    pub low_events: usize,
    pub high_events: usize,
}

/// Kind of user-authored log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Food,
    Medication,
    Exercise,
    Note,
}

impl EntryType {
    /// Parse a CLI/user-supplied type name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "food" => Some(EntryType::Food),
            "medication" => Some(EntryType::Medication),
            "exercise" => Some(EntryType::Exercise),
            "note" => Some(EntryType::Note),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryType::Food => "Food",
            EntryType::Medication => "Medication",
            EntryType::Exercise => "Exercise",
            EntryType::Note => "Note",
        }
    }
}

/// A stored log entry with its assigned id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glucose_reading: Option<u16>,
}

/// A log entry as submitted by the user, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glucose_reading: Option<u16>,
}

impl NewLogEntry {
    /// Caller-side validation: the entry text must be non-empty.
    /// The stores themselves accept any well-formed entry.
    pub fn validate(&self) -> Result<(), DashError> {
        if self.value.trim().is_empty() {
            return Err(DashError::Validation(
                "log entry text must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// User profile as served by the remote backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub last_scanned: DateTime<Utc>,
    pub target_range: TargetRange,
    pub device: DeviceInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: u16,
    pub max: u16,
}

/// Paired sensor device metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub name: String,
    pub battery_level: u8,
    pub last_sync: DateTime<Utc>,
}
