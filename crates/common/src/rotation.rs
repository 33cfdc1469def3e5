//! Rotation about an arbitrary line in space.
//!
//! The line passes through `point` and runs parallel to `direction`. Angles are
//! in radians and follow the right-hand rule around `direction`.

use glam::{Mat3, Mat4, Vec3};

/// Direction vectors at or below this length are rejected.
pub const TOLERANCE: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RotationError {
    #[error("rotation direction vector too short (length {length})")]
    DirectionTooShort { length: f32 },
}

fn unit_direction(direction: Vec3) -> Result<Vec3, RotationError> {
    let length = direction.length();
    if length > TOLERANCE && length.is_finite() {
        Ok(direction / length)
    } else {
        Err(RotationError::DirectionTooShort { length })
    }
}

/// Affine rotation about the line through `point` parallel to `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    linear: Mat3,
    translation: Vec3,
}

impl RotationMatrix {
    pub fn new(point: Vec3, direction: Vec3, theta: f32) -> Result<Self, RotationError> {
        let Vec3 { x: a, y: b, z: c } = point;
        let Vec3 { x: u, y: v, z: w } = unit_direction(direction)?;
        let (u2, v2, w2) = (u * u, v * v, w * w);
        let (sin_t, cos_t) = theta.sin_cos();
        let one_minus_cos = 1.0 - cos_t;

        let m11 = u2 + (v2 + w2) * cos_t;
        let m12 = u * v * one_minus_cos - w * sin_t;
        let m13 = u * w * one_minus_cos + v * sin_t;
        let m14 = (a * (v2 + w2) - u * (b * v + c * w)) * one_minus_cos + (b * w - c * v) * sin_t;

        let m21 = u * v * one_minus_cos + w * sin_t;
        let m22 = v2 + (u2 + w2) * cos_t;
        let m23 = v * w * one_minus_cos - u * sin_t;
        let m24 = (b * (u2 + w2) - v * (a * u + c * w)) * one_minus_cos + (c * u - a * w) * sin_t;

        let m31 = u * w * one_minus_cos - v * sin_t;
        let m32 = v * w * one_minus_cos + u * sin_t;
        let m33 = w2 + (u2 + v2) * cos_t;
        let m34 = (c * (u2 + v2) - w * (a * u + b * v)) * one_minus_cos + (a * v - b * u) * sin_t;

        // glam matrices are column-major.
        let linear = Mat3::from_cols(
            Vec3::new(m11, m21, m31),
            Vec3::new(m12, m22, m32),
            Vec3::new(m13, m23, m33),
        );
        Ok(Self {
            linear,
            translation: Vec3::new(m14, m24, m34),
        })
    }

    /// Rotate a single point.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.linear * point + self.translation
    }

    /// The homogeneous 4x4 form.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.linear.x_axis.extend(0.0),
            self.linear.y_axis.extend(0.0),
            self.linear.z_axis.extend(0.0),
            self.translation.extend(1.0),
        )
    }
}

/// Rotate one point without building the matrix.
pub fn rotate_point(
    line_point: Vec3,
    direction: Vec3,
    point: Vec3,
    theta: f32,
) -> Result<Vec3, RotationError> {
    let Vec3 { x: a, y: b, z: c } = line_point;
    let Vec3 { x: u, y: v, z: w } = unit_direction(direction)?;
    let Vec3 { x, y, z } = point;
    let (u2, v2, w2) = (u * u, v * v, w * w);
    let (sin_t, cos_t) = theta.sin_cos();
    let one_minus_cos = 1.0 - cos_t;
    let dot = u * x + v * y + w * z;

    Ok(Vec3::new(
        (a * (v2 + w2) - u * (b * v + c * w - dot)) * one_minus_cos
            + x * cos_t
            + (-c * v + b * w - w * y + v * z) * sin_t,
        (b * (u2 + w2) - v * (a * u + c * w - dot)) * one_minus_cos
            + y * cos_t
            + (c * u - a * w + w * x - u * z) * sin_t,
        (c * (u2 + v2) - w * (a * u + b * v - dot)) * one_minus_cos
            + z * cos_t
            + (-b * u + a * v - v * x + u * y) * sin_t,
    ))
}
