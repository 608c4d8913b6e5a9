// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-capacity, insertion-ordered buffer of accepted messages.

use std::collections::VecDeque;

use vigil_core::types::HistoryRecord;

/// Records kept for the dashboard.
pub const HISTORY_CAPACITY: usize = 100;

/// FIFO ring of the most recent [`HistoryRecord`]s.
///
/// Insertion order is preserved; appending to a full buffer evicts the
/// oldest record. Records are never mutated after insertion, only evicted.
#[derive(Debug)]
pub struct HistoryBuffer {
    capacity: usize,
    records: VecDeque<HistoryRecord>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a record, evicting the oldest when full. O(1) amortized.
    pub fn append(&mut self, record: HistoryRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Returns the buffered records oldest-first, without mutating state.
    pub fn snapshot(&self) -> Vec<HistoryRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
