//! # Telemetry State
//!
//! The single authoritative current-sample record. Exactly one writer is
//! active at a time — the live ingestion path or the simulator, enforced by
//! the station's link state machine — and the refresh scheduler reads it
//! between writes. Ownership lives with the station dispatcher, so access
//! is already serialized and no locking is involved.

use crate::frame::TelemetrySample;

/// Current sample plus the time it was accepted.
#[derive(Debug, Clone, Default)]
pub struct TelemetryState {
    current: TelemetrySample,
    last_update: f64,
}

impl TelemetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current sample.
    pub fn update(&mut self, sample: TelemetrySample, timestamp: f64) {
        self.current = sample;
        self.last_update = timestamp;
    }

    /// The current sample and the timestamp of its acceptance.
    pub fn read(&self) -> (&TelemetrySample, f64) {
        (&self.current, self.last_update)
    }

    pub fn current(&self) -> &TelemetrySample {
        &self.current
    }

    /// Seconds since the last accepted update, clamped at zero.
    ///
    /// A growing lag flags a silent transport in the UI; it is a staleness
    /// indicator, never an error condition.
    pub fn lag_seconds(&self, now: f64) -> f64 {
        (now - self.last_update).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_replaces_current() {
        let mut state = TelemetryState::new();
        let sample = TelemetrySample {
            altitude: 450.2,
            ..Default::default()
        };
        state.update(sample, 100.0);

        let (read, ts) = state.read();
        assert_eq!(read.altitude, 450.2);
        assert_eq!(ts, 100.0);
    }

    #[test]
    fn test_lag_resets_after_update() {
        let mut state = TelemetryState::new();
        state.update(TelemetrySample::default(), 50.0);
        assert_eq!(state.lag_seconds(50.0), 0.0);
        assert!(state.lag_seconds(50.001) < 0.01);
    }

    #[test]
    fn test_lag_grows_monotonically_between_updates() {
        let mut state = TelemetryState::new();
        state.update(TelemetrySample::default(), 10.0);

        let mut previous = 0.0;
        for tick in 1..=5 {
            let lag = state.lag_seconds(10.0 + tick as f64);
            assert!(lag >= previous);
            previous = lag;
        }
        assert_eq!(previous, 5.0);
    }

    #[test]
    fn test_lag_clamped_at_zero() {
        let mut state = TelemetryState::new();
        state.update(TelemetrySample::default(), 100.0);
        // A clock that reads slightly behind the update never goes negative
        assert_eq!(state.lag_seconds(99.5), 0.0);
    }
}
