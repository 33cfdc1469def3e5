//! Shared types for thingview: identifiers, transforms and vector helpers.
//!
//! `Vector` is `glam::Vec3` throughout the workspace; screen-space points are
//! `glam::Vec2`. Keeping the two as distinct types is what stops 2D and 3D
//! coordinates from being mixed.

mod math;
mod rotation;
mod types;

pub use math::{Vector, vectors_from};
pub use rotation::{RotationError, RotationMatrix, TOLERANCE, rotate_point};
pub use types::{ThingId, Transform};

pub fn crate_info() -> &'static str {
    "thingview-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
