use crate::RenderError;
use crate::camera::{Camera, Viewport};
use glam::{Quat, Vec2, Vec3};

/// Errors from projecting a point onto the screen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// The point lies on the camera plane; the perspective divide is undefined.
    #[error("cannot project a point at depth z = {z}")]
    Domain { z: f32 },
    #[error("projection input or result is not finite")]
    NonFinite,
    #[error("invalid camera: {0}")]
    InvalidCamera(String),
}

/// A projected point: screen position in pixels plus camera-space depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub position: Vec2,
    pub depth: f32,
}

/// Perspective divide of a camera-space point.
///
/// `x_s = cx + focal * x / z` and `y_s = cy - focal * y / z` (screen `y`
/// grows downward). Points behind the camera (`z < 0`) still project; callers
/// cull against the clip planes.
pub fn project_point(
    view: Vec3,
    focal: f32,
    viewport: Viewport,
) -> Result<ScreenPoint, ProjectionError> {
    if !view.is_finite() || !focal.is_finite() {
        return Err(ProjectionError::NonFinite);
    }
    if view.z == 0.0 {
        return Err(ProjectionError::Domain { z: view.z });
    }
    let center = viewport.center();
    let position = Vec2::new(
        center.x + focal * view.x / view.z,
        center.y - focal * view.y / view.z,
    );
    if !position.is_finite() {
        return Err(ProjectionError::NonFinite);
    }
    Ok(ScreenPoint {
        position,
        depth: view.z,
    })
}

/// A validated camera/viewport pair with the per-frame constants precomputed.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    position: Vec3,
    inverse_orientation: Quat,
    focal: f32,
    viewport: Viewport,
}

impl Projector {
    pub fn new(camera: &Camera, viewport: Viewport) -> Result<Self, RenderError> {
        viewport.validate()?;
        camera.validate()?;
        Ok(Self {
            position: camera.position,
            inverse_orientation: camera.orientation.inverse(),
            focal: camera.focal_length(viewport),
            viewport,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    pub fn to_view(&self, point: Vec3) -> Vec3 {
        self.inverse_orientation * (point - self.position)
    }

    /// Project a camera-space point.
    pub fn project_view(&self, view: Vec3) -> Result<ScreenPoint, ProjectionError> {
        project_point(view, self.focal, self.viewport)
    }

    /// Project a world-space point.
    pub fn project(&self, point: Vec3) -> Result<ScreenPoint, ProjectionError> {
        self.project_view(self.to_view(point))
    }
}
