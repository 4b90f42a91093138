//! Bounded record of recent route searches.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::search::RouteResult;

/// One recorded search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub requested_at: DateTime<Utc>,
    pub result: RouteResult,
}

/// Summary figures over the recorded searches.
///
/// Means are taken over valid results only and are zero when there are none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub valid: usize,
    pub mean_time: f64,
    pub mean_distance: f64,
    pub mean_fare: f64,
}

/// Most recent searches, oldest first, up to a fixed capacity.
///
/// Recording into a full history evicts the oldest entry. A capacity of zero
/// records nothing.
#[derive(Debug, Clone)]
pub struct RouteHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl RouteHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a result stamped with the current time.
    pub fn record(&mut self, result: RouteResult) {
        self.record_at(Utc::now(), result);
    }

    pub fn record_at(&mut self, requested_at: DateTime<Utc>, result: RouteResult) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            requested_at,
            result,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recent `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn statistics(&self) -> HistoryStats {
        let valid: Vec<&RouteResult> = self
            .entries
            .iter()
            .map(|e| &e.result)
            .filter(|r| r.is_valid())
            .collect();

        let mut stats = HistoryStats {
            total: self.entries.len(),
            valid: valid.len(),
            ..HistoryStats::default()
        };

        if !valid.is_empty() {
            let count = valid.len() as f64;
            stats.mean_time = valid.iter().map(|r| r.total_time()).sum::<f64>() / count;
            stats.mean_distance = valid.iter().map(|r| r.total_distance()).sum::<f64>() / count;
            stats.mean_fare = valid.iter().map(|r| r.total_fare()).sum::<f64>() / count;
        }

        stats
    }
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self::new(50)
    }
}
