use crate::RenderError;
use crate::camera::{Camera, Viewport};
use crate::painter::project_world;
use thingview_kernel::World;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the World and a camera and produces output. It never
/// mutates the World. Renderers may keep state between frames (the DOM
/// renderer remembers its previous elements), hence `&mut self`.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, world: &World, camera: &Camera) -> Result<Self::Output, RenderError>;
}

/// Human-readable frame dump for CLI output, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    viewport: Viewport,
}

impl DebugTextRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, world: &World, camera: &Camera) -> Result<String, RenderError> {
        let frame = project_world(world, camera, self.viewport)?;
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {}x{} (things={}, visible={}, culled={}) ===\n",
            self.viewport.width,
            self.viewport.height,
            world.len(),
            frame.faces.len(),
            frame.culled
        ));
        let p = camera.position;
        out.push_str(&format!(
            "Camera: pos=({:.1}, {:.1}, {:.1}) fov={:.0} zoom={:.0}\n",
            p.x, p.y, p.z, camera.fov_degrees, camera.zoom
        ));
        for thing in world.things() {
            let p = thing.transform.position;
            out.push_str(&format!(
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) vertices={} faces={}\n",
                thing.id(),
                thing.name,
                p.x,
                p.y,
                p.z,
                thing.vertices().len(),
                thing.faces().len()
            ));
        }
        out.push_str("Paint order:\n");
        for (rank, face) in frame.faces.iter().enumerate() {
            out.push_str(&format!(
                "  #{} [{}] face {} depth={:.2}\n",
                rank + 1,
                face.thing,
                face.face,
                face.depth
            ));
        }
        Ok(out)
    }
}
