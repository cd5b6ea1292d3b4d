//! # Telemetry Sample Types
//!
//! Typed representations of one telemetry instant, on both sides of the
//! parser: `ParsedFrame` keeps per-field presence so a literal `A-0` is not
//! confused with a missing altitude token, while `TelemetrySample` is the
//! zero-filled record the rest of the pipeline consumes.

use serde::Serialize;

/// One instant's readings across all tracked channels.
///
/// Fields absent from the originating wire frame are zero. Units follow the
/// upstream firmware convention: altitude in meters, temperature in °C,
/// pressure in hPa, yaw angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TelemetrySample {
    pub altitude: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub acc_x: f64,
    pub acc_y: f64,
    pub acc_z: f64,
    pub yaw_x: f64,
    pub yaw_y: f64,
    pub yaw_z: f64,
    /// Ingestion timestamp, seconds since epoch
    pub timestamp: f64,
}

/// Parser output: recognized fields of a telemetry line, with presence.
///
/// `None` means the key did not appear on the line (or its value failed to
/// parse), not that the value was zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParsedFrame {
    pub altitude: Option<f64>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub acc_x: Option<f64>,
    pub acc_y: Option<f64>,
    pub acc_z: Option<f64>,
    pub yaw_x: Option<f64>,
    pub yaw_y: Option<f64>,
    pub yaw_z: Option<f64>,
}

impl ParsedFrame {
    /// True if no recognized key carried a parsable value.
    pub fn is_empty(&self) -> bool {
        self.altitude.is_none()
            && self.temperature.is_none()
            && self.pressure.is_none()
            && self.acc_x.is_none()
            && self.acc_y.is_none()
            && self.acc_z.is_none()
            && self.yaw_x.is_none()
            && self.yaw_y.is_none()
            && self.yaw_z.is_none()
    }

    /// Materialize the frame into a sample, zero-filling absent fields.
    ///
    /// # Arguments
    ///
    /// * `timestamp` - Ingestion time, seconds since epoch
    pub fn into_sample(self, timestamp: f64) -> TelemetrySample {
        TelemetrySample {
            altitude: self.altitude.unwrap_or(0.0),
            temperature: self.temperature.unwrap_or(0.0),
            pressure: self.pressure.unwrap_or(0.0),
            acc_x: self.acc_x.unwrap_or(0.0),
            acc_y: self.acc_y.unwrap_or(0.0),
            acc_z: self.acc_z.unwrap_or(0.0),
            yaw_x: self.yaw_x.unwrap_or(0.0),
            yaw_y: self.yaw_y.unwrap_or(0.0),
            yaw_z: self.yaw_z.unwrap_or(0.0),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sample_is_all_zero() {
        let sample = TelemetrySample::default();
        assert_eq!(sample.altitude, 0.0);
        assert_eq!(sample.yaw_z, 0.0);
        assert_eq!(sample.timestamp, 0.0);
    }

    #[test]
    fn test_empty_frame() {
        assert!(ParsedFrame::default().is_empty());

        let frame = ParsedFrame {
            pressure: Some(0.0),
            ..Default::default()
        };
        assert!(!frame.is_empty(), "present-with-zero is not absent");
    }

    #[test]
    fn test_into_sample_zero_fills_absent_fields() {
        let frame = ParsedFrame {
            altitude: Some(450.2),
            yaw_x: Some(-10.0),
            ..Default::default()
        };

        let sample = frame.into_sample(1000.5);
        assert_eq!(sample.altitude, 450.2);
        assert_eq!(sample.yaw_x, -10.0);
        assert_eq!(sample.temperature, 0.0);
        assert_eq!(sample.acc_z, 0.0);
        assert_eq!(sample.timestamp, 1000.5);
    }
}
