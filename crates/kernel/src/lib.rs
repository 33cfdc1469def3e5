//! World Kernel: Things (vertices + faces) and the World that holds them.
//!
//! # Invariants
//! - A face only refers to vertices of its own Thing.
//! - `World::things()` iterates in insertion order; renderers rely on it to
//!   break depth ties.
//! - Renderers read the world; only explicit operations mutate it.

pub mod face;
pub mod thing;
pub mod world;

pub use face::{Bounds3, Face};
pub use thing::Thing;
pub use world::World;

/// Errors from building or editing Things.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("a face needs at least 3 vertices, got {len}")]
    FaceTooSmall { len: usize },
    #[error("vertex index {index} out of range (thing has {len} vertices)")]
    VertexOutOfRange { index: usize, len: usize },
    #[error("invalid cuboid dimensions ({x}, {y}, {z})")]
    InvalidDimensions { x: f32, y: f32, z: f32 },
}
