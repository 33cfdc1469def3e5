//! Rendering: perspective projection of a World onto a 2D DOM-style surface.
//!
//! # Invariants
//! - Renderers read the World; they never mutate it.
//! - No output carries `NaN` or `Infinity`. Geometry that cannot be
//!   projected is culled or reported as a typed error.
//! - Faces are painted farthest first; equal depths keep insertion order.

mod camera;
mod coverage;
mod dom;
mod geometry;
mod painter;
mod projection;
mod renderer;

pub use camera::{Camera, Viewport};
pub use coverage::{CoverageHit, CoverageMap, CoverageRenderer};
pub use dom::{DomFrame, DomPatch, DomRenderer, DomRendererConfig, FaceElement, FaceStyle};
pub use geometry::{Polygon2, Rect};
pub use painter::{FrameGeometry, ProjectedFace, painter_order, project_world};
pub use projection::{ProjectionError, Projector, ScreenPoint, project_point};
pub use renderer::{DebugTextRenderer, Renderer};

/// Errors from rendering a frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}

pub fn crate_info() -> &'static str {
    "thingview-render v0.1.0"
}
