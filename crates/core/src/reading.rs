//! Timestamped sensor readings and the rolling window that holds them.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One timestamped snapshot of every tracked metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Metric key → value, in the order the producer emitted them.
    pub values: IndexMap<String, f64>,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            values: IndexMap::new(),
        }
    }

    /// Builder-style insert, handy for tests and generators.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Value for `key`, or `None` if the metric is missing or not a finite number.
    pub fn finite(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().filter(|v| v.is_finite())
    }
}

/// Time-ascending, fixed-capacity window of readings.
///
/// Pushing into a full window evicts the oldest sample. Readings that are not
/// strictly newer than the current newest one are dropped.
#[derive(Debug, Clone)]
pub struct ReadingWindow {
    capacity: usize,
    readings: VecDeque<Reading>,
}

impl ReadingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            readings: VecDeque::with_capacity(capacity),
        }
    }

    /// Build a window from an arbitrary sequence: sorts by timestamp, drops
    /// duplicate timestamps and keeps the newest `capacity` samples.
    pub fn from_unordered(capacity: usize, mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|r| r.timestamp);
        let mut window = Self::new(capacity);
        window.extend(readings);
        window
    }

    /// Append a reading. Returns `false` if it was rejected as out of order.
    pub fn push(&mut self, reading: Reading) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if let Some(last) = self.readings.back() {
            if reading.timestamp <= last.timestamp {
                return false;
            }
        }
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
        true
    }

    pub fn extend(&mut self, readings: impl IntoIterator<Item = Reading>) {
        for r in readings {
            self.push(r);
        }
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn into_vec(self) -> Vec<Reading> {
        self.readings.into()
    }
}
