use crate::engine::CalculationOutcome;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// One persisted calculation: the outcome plus its id and timestamps.
/// Serializes flat, in the same shape an API resource would return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Process-local auto-increment id, starting at 1
    pub id: u64,
    /// The calculation this record persists
    #[serde(flatten)]
    pub outcome: CalculationOutcome,
    /// When the record was stored
    pub created_at: DateTime<Utc>,
    /// Last modification time; equals `created_at` for now
    pub updated_at: DateTime<Utc>,
}

/// Thread-safe, in-memory ticker tape of past calculations.
///
/// Ids are handed out from a monotonically increasing counter starting at
/// 1; clearing the tape does not reset the counter, matching an
/// auto-increment table.
///
/// ```
/// use tickertape::{CalculationEngine, CalculationInput, HistoryStore};
///
/// let engine = CalculationEngine::default();
/// let history = HistoryStore::default();
/// let outcome = engine
///     .evaluate(&CalculationInput::expression("2^3"))
///     .unwrap();
/// let record = history.record(outcome);
/// assert_eq!(record.id, 1);
/// assert_eq!(history.list().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: RwLock<Vec<CalculationRecord>>,
    next_id: AtomicU64,
}

impl HistoryStore {
    /// Persist an outcome and return the stored record.
    pub fn record(&self, outcome: CalculationOutcome) -> CalculationRecord {
        let now = Utc::now();
        let record = CalculationRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            outcome,
            created_at: now,
            updated_at: now,
        };
        debug!(id = record.id, mode = %record.outcome.mode, "recorded calculation");
        self.records.write().push(record.clone());
        record
    }

    /// All records, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<CalculationRecord> {
        self.records.read().iter().rev().cloned().collect()
    }

    /// Look up a single record by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<CalculationRecord> {
        self.records
            .read()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Delete one record; `true` when it existed.
    pub fn delete(&self, id: u64) -> bool {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|record| record.id != id);
        let deleted = records.len() < before;
        if deleted {
            debug!(id, "deleted calculation");
        }
        deleted
    }

    /// Drop every record and report how many were removed.
    pub fn clear(&self) -> usize {
        let mut records = self.records.write();
        let deleted_count = records.len();
        records.clear();
        debug!(deleted_count, "cleared calculation history");
        deleted_count
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the tape is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
