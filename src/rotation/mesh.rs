//! # Display Mesh
//!
//! Static cylinder geometry standing in for the CanSat body. The surface is
//! sampled once at startup as a `rows × cols` grid of points (no end caps);
//! every refresh tick rotates a copy of the grid by the current attitude
//! matrix. The base mesh itself never changes.

use nalgebra::{Matrix3, Vector3};

/// CanSat body radius in meters (standard 66 mm can).
pub const BODY_RADIUS: f64 = 0.033;

/// CanSat body height in meters.
pub const BODY_HEIGHT: f64 = 0.115;

/// Grid resolution around the circumference.
pub const DEFAULT_THETA_STEPS: usize = 80;

/// Grid resolution along the axis.
pub const DEFAULT_Z_STEPS: usize = 40;

/// A fixed grid of surface points, row-major: `rows` rings of `cols`
/// points each.
#[derive(Debug, Clone)]
pub struct Mesh {
    points: Vec<Vector3<f64>>,
    rows: usize,
    cols: usize,
}

impl Mesh {
    /// Sample a parametric cylinder surface centered on the origin.
    ///
    /// # Arguments
    ///
    /// * `radius` - Cylinder radius in meters
    /// * `height` - Cylinder height in meters
    /// * `theta_steps` - Points per ring (includes the seam point twice)
    /// * `z_steps` - Number of rings
    pub fn cylinder(radius: f64, height: f64, theta_steps: usize, z_steps: usize) -> Self {
        let mut points = Vec::with_capacity(theta_steps * z_steps);

        for zi in 0..z_steps {
            // Rings span [-H/2, H/2] inclusive
            let frac = if z_steps > 1 {
                zi as f64 / (z_steps - 1) as f64
            } else {
                0.5
            };
            let z = -height / 2.0 + frac * height;

            for ti in 0..theta_steps {
                let theta = if theta_steps > 1 {
                    ti as f64 / (theta_steps - 1) as f64 * std::f64::consts::TAU
                } else {
                    0.0
                };
                points.push(Vector3::new(radius * theta.cos(), radius * theta.sin(), z));
            }
        }

        Self {
            points,
            rows: z_steps,
            cols: theta_steps,
        }
    }

    /// The default CanSat body mesh.
    pub fn cansat_body() -> Self {
        Self::cylinder(BODY_RADIUS, BODY_HEIGHT, DEFAULT_THETA_STEPS, DEFAULT_Z_STEPS)
    }

    /// Rotate every grid point, producing display coordinates. The base
    /// mesh is untouched.
    pub fn rotated(&self, r: &Matrix3<f64>) -> Vec<Vector3<f64>> {
        self.points.iter().map(|p| r * p).collect()
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}
