use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a Thing in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingId(pub Uuid);

impl ThingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ThingId {
    fn default() -> Self {
        Self::new()
    }
}

/// Short form (first 8 hex digits), used for DOM keys and log lines.
impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform at `position` with no rotation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Build a transform from a position and XYZ Euler angles in degrees.
    pub fn from_euler_degrees(position: Vec3, degrees: [f32; 3]) -> Self {
        let [x, y, z] = degrees;
        Self {
            position,
            rotation: Quat::from_euler(
                EulerRot::XYZ,
                x.to_radians(),
                y.to_radians(),
                z.to_radians(),
            ),
            scale: Vec3::ONE,
        }
    }

    /// Map a point from local space into world space.
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }
}
