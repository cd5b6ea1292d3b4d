//! # Render Payloads
//!
//! Everything the (external) rendering layer needs per refresh tick,
//! computed here as plain data: metric readouts, chart series, and the
//! rotated 3D scene. The rendering collaborator receives these through the
//! `RenderSink` trait and paints however it likes; nothing in this module
//! draws.

use nalgebra::Vector3;

use crate::history::{HistoryBuffer, HistorySnapshot};
use crate::rotation::{self, Mesh};
use crate::state::TelemetryState;

/// Body-frame axis indicator length in meters, matching the body mesh scale.
pub const AXIS_LENGTH: f64 = 0.08;

/// Current values of all nine channels plus the staleness indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub altitude: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub acc_x: f64,
    pub acc_y: f64,
    pub acc_z: f64,
    pub yaw_x: f64,
    pub yaw_y: f64,
    pub yaw_z: f64,
    /// Seconds since the last accepted update; a UI warning, not a fault
    pub lag_seconds: f64,
}

/// One rotated body axis, drawn from the origin to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLine {
    pub label: &'static str,
    pub end: Vector3<f64>,
}

/// The rotated 3D scene.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Rotated mesh points, row-major `mesh_rows × mesh_cols`
    pub mesh_points: Vec<Vector3<f64>>,
    pub mesh_rows: usize,
    pub mesh_cols: usize,
    /// X, Y, Z body axes after rotation
    pub axes: [AxisLine; 3],
    /// e.g. "Yaw 10.0°, Pitch 0.0°, Roll -3.2°"
    pub title: String,
}

/// Complete per-tick payload for the rendering layer.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub metrics: Metrics,
    pub series: HistorySnapshot,
    pub scene: Scene,
}

/// Consumer side of the refresh pipeline; implemented by the rendering
/// collaborator (and by recording fakes in tests).
pub trait RenderSink {
    fn present(&mut self, payload: &RenderPayload);
}

/// Build the full payload from current state and history.
///
/// The rotation matrix is recomputed from the sample's yaw angles on every
/// call: yaw about Z from `yaw_z`, pitch about Y from `yaw_y`, roll about X
/// from `yaw_x`.
pub fn build_payload(
    state: &TelemetryState,
    history: &HistoryBuffer,
    mesh: &Mesh,
    now: f64,
) -> RenderPayload {
    let sample = state.current();

    let r = rotation::rotation_matrix(sample.yaw_z, sample.yaw_y, sample.yaw_x);

    let axes = [
        AxisLine { label: "X", end: rotation::rotate_vector(&(Vector3::x() * AXIS_LENGTH), &r) },
        AxisLine { label: "Y", end: rotation::rotate_vector(&(Vector3::y() * AXIS_LENGTH), &r) },
        AxisLine { label: "Z", end: rotation::rotate_vector(&(Vector3::z() * AXIS_LENGTH), &r) },
    ];

    RenderPayload {
        metrics: Metrics {
            altitude: sample.altitude,
            temperature: sample.temperature,
            pressure: sample.pressure,
            acc_x: sample.acc_x,
            acc_y: sample.acc_y,
            acc_z: sample.acc_z,
            yaw_x: sample.yaw_x,
            yaw_y: sample.yaw_y,
            yaw_z: sample.yaw_z,
            lag_seconds: state.lag_seconds(now),
        },
        series: history.snapshot(),
        scene: Scene {
            mesh_points: mesh.rotated(&r),
            mesh_rows: mesh.rows(),
            mesh_cols: mesh.cols(),
            axes,
            title: format!(
                "Yaw {:.1}°, Pitch {:.1}°, Roll {:.1}°",
                sample.yaw_z, sample.yaw_y, sample.yaw_x
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::TelemetrySample;

    fn state_with(sample: TelemetrySample, ts: f64) -> TelemetryState {
        let mut state = TelemetryState::new();
        state.update(sample, ts);
        state
    }

    #[test]
    fn test_metrics_mirror_current_sample() {
        let state = state_with(
            TelemetrySample {
                altitude: 450.2,
                temperature: 27.5,
                yaw_z: 10.0,
                ..Default::default()
            },
            100.0,
        );
        let history = HistoryBuffer::new(10);
        let mesh = Mesh::cylinder(0.033, 0.115, 8, 4);

        let payload = build_payload(&state, &history, &mesh, 102.5);
        assert_eq!(payload.metrics.altitude, 450.2);
        assert_eq!(payload.metrics.temperature, 27.5);
        assert_eq!(payload.metrics.yaw_z, 10.0);
        assert!((payload.metrics.lag_seconds - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_title_shows_one_decimal() {
        let state = state_with(
            TelemetrySample {
                yaw_x: -3.25,
                yaw_y: 0.0,
                yaw_z: 10.04,
                ..Default::default()
            },
            0.0,
        );
        let history = HistoryBuffer::new(10);
        let mesh = Mesh::cylinder(0.033, 0.115, 4, 2);

        let payload = build_payload(&state, &history, &mesh, 0.0);
        assert_eq!(payload.scene.title, "Yaw 10.0°, Pitch 0.0°, Roll -3.2°");
    }

    #[test]
    fn test_zero_attitude_leaves_axes_on_basis_vectors() {
        let state = state_with(TelemetrySample::default(), 0.0);
        let history = HistoryBuffer::new(10);
        let mesh = Mesh::cylinder(0.033, 0.115, 4, 2);

        let payload = build_payload(&state, &history, &mesh, 0.0);
        let [x, y, z] = &payload.scene.axes;
        assert!((x.end - Vector3::x() * AXIS_LENGTH).norm() < 1e-12);
        assert!((y.end - Vector3::y() * AXIS_LENGTH).norm() < 1e-12);
        assert!((z.end - Vector3::z() * AXIS_LENGTH).norm() < 1e-12);
    }

    #[test]
    fn test_series_and_mesh_shapes() {
        let mut history = HistoryBuffer::new(10);
        let state = state_with(TelemetrySample::default(), 0.0);
        for i in 0..3 {
            history.push(state.current(), i as f64);
        }
        let mesh = Mesh::cylinder(0.033, 0.115, 6, 5);

        let payload = build_payload(&state, &history, &mesh, 0.0);
        assert_eq!(payload.series.time.len(), 3);
        assert_eq!(payload.scene.mesh_points.len(), 30);
        assert_eq!(payload.scene.mesh_rows, 5);
        assert_eq!(payload.scene.mesh_cols, 6);
    }
}
