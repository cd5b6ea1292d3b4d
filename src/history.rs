//! # Rolling History Buffer
//!
//! Bounded, time-ordered sample log backing the trend charts.
//!
//! Four parallel sequences (time, altitude, temperature, pressure) share
//! one capacity; a push appends to all four and truncates all four in the
//! same call, so no reader ever observes a sequence over capacity or the
//! sequences out of step with each other.

use std::collections::VecDeque;

use crate::frame::TelemetrySample;

/// Default number of retained samples.
pub const DEFAULT_CAPACITY: usize = 200;

/// Bounded FIFO log of charted channels.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    time: VecDeque<f64>,
    altitude: VecDeque<f64>,
    temperature: VecDeque<f64>,
    pressure: VecDeque<f64>,
}

/// Owned copy of the history sequences, safe to hand to the render layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySnapshot {
    pub time: Vec<f64>,
    pub altitude: Vec<f64>,
    pub temperature: Vec<f64>,
    pub pressure: Vec<f64>,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            time: VecDeque::with_capacity(capacity),
            altitude: VecDeque::with_capacity(capacity),
            temperature: VecDeque::with_capacity(capacity),
            pressure: VecDeque::with_capacity(capacity),
        }
    }

    /// Append one point to every sequence, dropping the oldest entries once
    /// capacity is exceeded. Samples arrive in order; there is no
    /// reordering and no other removal path.
    pub fn push(&mut self, sample: &TelemetrySample, timestamp: f64) {
        self.time.push_back(timestamp);
        self.altitude.push_back(sample.altitude);
        self.temperature.push_back(sample.temperature);
        self.pressure.push_back(sample.pressure);

        while self.time.len() > self.capacity {
            self.time.pop_front();
            self.altitude.pop_front();
            self.temperature.pop_front();
            self.pressure.pop_front();
        }
    }

    /// Copy out the current sequences for rendering.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            time: self.time.iter().copied().collect(),
            altitude: self.altitude.iter().copied().collect(),
            temperature: self.temperature.iter().copied().collect(),
            pressure: self.pressure.iter().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(altitude: f64) -> TelemetrySample {
        TelemetrySample {
            altitude,
            temperature: altitude / 10.0,
            pressure: 1013.0 - altitude,
            ..Default::default()
        }
    }

    #[test]
    fn test_push_and_snapshot() {
        let mut history = HistoryBuffer::new(10);
        history.push(&sample_at(100.0), 1.0);
        history.push(&sample_at(110.0), 2.0);

        let snap = history.snapshot();
        assert_eq!(snap.time, vec![1.0, 2.0]);
        assert_eq!(snap.altitude, vec![100.0, 110.0]);
        assert_eq!(snap.temperature, vec![10.0, 11.0]);
        assert_eq!(snap.pressure, vec![913.0, 903.0]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut history = HistoryBuffer::new(5);
        for i in 0..17 {
            history.push(&sample_at(i as f64), i as f64);
            assert!(history.len() <= 5, "over capacity after push {}", i);
        }
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn test_truncation_keeps_most_recent_in_order() {
        let capacity = 4;
        let k = 3;
        let mut history = HistoryBuffer::new(capacity);
        for i in 0..(capacity + k) {
            history.push(&sample_at(i as f64), i as f64);
        }

        let snap = history.snapshot();
        let expected: Vec<f64> = (k..capacity + k).map(|i| i as f64).collect();
        assert_eq!(snap.time, expected);
        assert_eq!(snap.altitude, expected);
    }

    #[test]
    fn test_sequences_stay_parallel() {
        let mut history = HistoryBuffer::new(3);
        for i in 0..8 {
            history.push(&sample_at(i as f64), i as f64);
            let snap = history.snapshot();
            assert_eq!(snap.time.len(), snap.altitude.len());
            assert_eq!(snap.time.len(), snap.temperature.len());
            assert_eq!(snap.time.len(), snap.pressure.len());
        }
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut history = HistoryBuffer::new(3);
        history.push(&sample_at(1.0), 1.0);

        let snap = history.snapshot();
        history.push(&sample_at(2.0), 2.0);

        assert_eq!(snap.time.len(), 1, "snapshot must not track later pushes");
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(HistoryBuffer::default().capacity(), DEFAULT_CAPACITY);
        assert_eq!(DEFAULT_CAPACITY, 200);
    }
}
