//! Calculation history capability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Kind tag used for currency conversions.
pub const CURRENCY_KIND: &str = "currency";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub kind: String,
    pub input: Value,
    pub output: Value,
    pub recorded_at: DateTime<Utc>,
}

/// Receives every calculation that produced a result.
pub trait HistoryRecorder: Send + Sync {
    fn add_calculation(&self, kind: &str, input: Value, output: Value);
}

/// History kept for the lifetime of the process, newest entry last.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<CalculationRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<CalculationRecord> {
        self.lock().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recovers the entries from a poisoned lock; a push is never left
    /// half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<CalculationRecord>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("History lock was poisoned, continuing with existing entries");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl HistoryRecorder for MemoryHistory {
    fn add_calculation(&self, kind: &str, input: Value, output: Value) {
        let record = CalculationRecord {
            kind: kind.to_string(),
            input,
            output,
            recorded_at: Utc::now(),
        };
        debug!(kind, "Recording calculation");
        self.lock().push(record);
    }
}
