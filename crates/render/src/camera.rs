use crate::RenderError;
use crate::projection::ProjectionError;
use glam::{Mat3, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Pixel size of the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Viewpoint used for projection.
///
/// The camera looks down its local `+z` axis with `+y` up. `zoom` is a
/// percentage applied to the focal length (100 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub zoom: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            zoom: 100.0,
            fov_degrees: 90.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl Camera {
    /// Default camera placed at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn set_location(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Turn the camera to face `target`, keeping world `+y` up.
    ///
    /// Does nothing when `target` coincides with the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            tracing::warn!(?target, "look_at target equals camera position");
            return;
        };
        let right = Vec3::Y.cross(forward).try_normalize().unwrap_or(Vec3::X);
        let up = forward.cross(right);
        self.orientation = Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize();
    }

    /// Builder form of [`Camera::look_at`].
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.look_at(target);
        self
    }

    /// Map a world-space point into camera space.
    pub fn to_view(&self, point: Vec3) -> Vec3 {
        self.orientation.inverse() * (point - self.position)
    }

    /// Focal length in pixels for the given viewport.
    pub fn focal_length(&self, viewport: Viewport) -> f32 {
        let half_fov = self.fov_degrees.to_radians() / 2.0;
        (viewport.width as f32 / 2.0) / half_fov.tan() * self.zoom / 100.0
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        let invalid = |reason: String| Err(ProjectionError::InvalidCamera(reason));
        if !self.position.is_finite() {
            return invalid(format!("position {} is not finite", self.position));
        }
        if !self.orientation.is_finite() || !self.orientation.is_normalized() {
            return invalid(format!("orientation {} is not a unit quaternion", self.orientation));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return invalid(format!("field of view {} must be within (0, 180)", self.fov_degrees));
        }
        if !(self.zoom > 0.0 && self.zoom.is_finite()) {
            return invalid(format!("zoom {} must be positive", self.zoom));
        }
        if !(self.near > 0.0 && self.near < self.far && self.far.is_finite()) {
            return invalid(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                self.near, self.far
            ));
        }
        Ok(())
    }
}
