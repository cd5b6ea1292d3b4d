//! # Rotation Engine
//!
//! Pure 3D attitude math for the orientation display.
//!
//! Angles arrive in degrees (yaw about Z, pitch about Y, roll about X) and
//! compose as the intrinsic ZYX product `Rz · Ry · Rx`, applied
//! right-to-left to a vector: roll first, then pitch, then yaw. The
//! composition order is part of the contract — the live attitude display
//! depends on it — so it is built from explicit per-axis matrices rather
//! than a quaternion path.
//!
//! Matrices are recomputed on demand; nothing here caches or mutates.

pub mod mesh;

pub use mesh::Mesh;

use nalgebra::{Matrix3, Vector3};

/// Build the ZYX rotation matrix from attitude angles in degrees.
///
/// # Arguments
///
/// * `yaw_deg` - Rotation about the Z axis
/// * `pitch_deg` - Rotation about the Y axis
/// * `roll_deg` - Rotation about the X axis
pub fn rotation_matrix(yaw_deg: f64, pitch_deg: f64, roll_deg: f64) -> Matrix3<f64> {
    let z = yaw_deg.to_radians();
    let y = pitch_deg.to_radians();
    let x = roll_deg.to_radians();

    let (sz, cz) = z.sin_cos();
    let (sy, cy) = y.sin_cos();
    let (sx, cx) = x.sin_cos();

    #[rustfmt::skip]
    let rz = Matrix3::new(
        cz, -sz, 0.0,
        sz,  cz, 0.0,
        0.0, 0.0, 1.0,
    );

    #[rustfmt::skip]
    let ry = Matrix3::new(
         cy, 0.0,  sy,
        0.0, 1.0, 0.0,
        -sy, 0.0,  cy,
    );

    #[rustfmt::skip]
    let rx = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0,  cx, -sx,
        0.0,  sx,  cx,
    );

    rz * ry * rx
}

/// Apply a rotation matrix to a single vector.
pub fn rotate_vector(v: &Vector3<f64>, r: &Matrix3<f64>) -> Vector3<f64> {
    r * v
}
