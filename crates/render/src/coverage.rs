//! Ray-cast coverage: which face, if any, is visible at each pixel.
//!
//! A ray is cast through the centre of every pixel inside the frame bounds
//! (clipped to the viewport). Faces are tested nearest first, so the first
//! polygon that contains the sample is the visible one. Face bounding boxes
//! are checked before the polygon test.

use crate::RenderError;
use crate::camera::{Camera, Viewport};
use crate::geometry::Rect;
use crate::painter::{ProjectedFace, project_world};
use crate::renderer::Renderer;
use glam::Vec2;
use thingview_common::ThingId;
use thingview_kernel::World;

/// The face seen through one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageHit {
    /// Position in painter's order (0 = painted first).
    pub rank: usize,
    pub thing: ThingId,
    pub face: usize,
    pub depth: f32,
}

/// Per-pixel visibility over a rectangular region of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMap {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    cells: Vec<Option<CoverageHit>>,
}

impl CoverageMap {
    fn empty() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }

    /// Hit at absolute pixel `(x, y)`, if covered.
    pub fn get(&self, x: u32, y: u32) -> Option<&CoverageHit> {
        if x < self.x || y < self.y || x >= self.x + self.width || y >= self.y + self.height {
            return None;
        }
        let index = ((y - self.y) * self.width + (x - self.x)) as usize;
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Number of covered pixels.
    pub fn covered(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Covered pixels as `(x, y, hit)`, row by row.
    pub fn points(&self) -> impl Iterator<Item = (u32, u32, &CoverageHit)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let i = i as u32;
            cell.as_ref()
                .map(|hit| (self.x + i % self.width, self.y + i / self.width, hit))
        })
    }
}

#[derive(Debug, Default)]
pub struct CoverageRenderer {
    viewport: Viewport,
}

impl CoverageRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }
}

impl Renderer for CoverageRenderer {
    type Output = CoverageMap;

    fn render(&mut self, world: &World, camera: &Camera) -> Result<CoverageMap, RenderError> {
        let frame = project_world(world, camera, self.viewport)?;
        let screen = Rect {
            left: 0.0,
            top: 0.0,
            right: self.viewport.width as f32,
            bottom: self.viewport.height as f32,
        };
        let Some(region) = frame.bounds.and_then(|b| b.intersection(screen)) else {
            return Ok(CoverageMap::empty());
        };

        let x0 = region.left.floor() as u32;
        let y0 = region.top.floor() as u32;
        let x1 = (region.right.ceil() as u32).min(self.viewport.width);
        let y1 = (region.bottom.ceil() as u32).min(self.viewport.height);
        let (width, height) = (x1.saturating_sub(x0), y1.saturating_sub(y0));

        // Nearest first.
        let candidates: Vec<(usize, Rect, &ProjectedFace)> = frame
            .faces
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(rank, f)| f.polygon.bounds().map(|b| (rank, b, f)))
            .collect();

        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let hit = candidates
                    .iter()
                    .find(|(_, bounds, face)| bounds.contains(sample) && face.polygon.contains(sample))
                    .map(|(rank, _, face)| CoverageHit {
                        rank: *rank,
                        thing: face.thing,
                        face: face.face,
                        depth: face.depth,
                    });
                cells.push(hit);
            }
        }

        let map = CoverageMap {
            x: x0,
            y: y0,
            width,
            height,
            cells,
        };
        tracing::debug!(width, height, covered = map.covered(), "coverage rendered");
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use thingview_kernel::Thing;

    fn cube_world() -> World {
        let mut world = World::new();
        world.add(Thing::cuboid("cube", 100.0, 100.0, 100.0).unwrap());
        world
    }

    #[test]
    fn centre_pixel_sees_front_face() {
        let camera = Camera::at(Vec3::new(0.0, 0.0, -500.0));
        let mut renderer = CoverageRenderer::new(Viewport::new(800, 600));
        let map = renderer.render(&cube_world(), &camera).unwrap();
        let hit = map.get(400, 300).unwrap();
        assert_eq!(hit.face, 5);
        assert_eq!(hit.rank, 5);
        assert_eq!(hit.depth, 450.0);
    }

    #[test]
    fn pixels_outside_the_cube_are_empty() {
        let camera = Camera::at(Vec3::new(0.0, 0.0, -500.0));
        let mut renderer = CoverageRenderer::new(Viewport::new(800, 600));
        let map = renderer.render(&cube_world(), &camera).unwrap();
        assert!(map.get(10, 10).is_none());
        assert!(map.get(400, 200).is_none());
        // The region is the 90x90 box around the projected square.
        assert_eq!((map.x, map.y, map.width, map.height), (355, 255, 90, 90));
    }

    #[test]
    fn covered_area_matches_projected_square() {
        let camera = Camera::at(Vec3::new(0.0, 0.0, -500.0));
        let mut renderer = CoverageRenderer::new(Viewport::new(800, 600));
        let map = renderer.render(&cube_world(), &camera).unwrap();
        // 88.9px square: between 88*88 and 90*90 pixel centres fall inside.
        let covered = map.covered();
        assert!((88 * 88..=90 * 90).contains(&covered), "covered {covered}");
        assert_eq!(map.points().count(), covered);
        assert!(map.points().all(|(x, y, _)| map.get(x, y).is_some()));
    }

    #[test]
    fn nearer_thing_occludes_farther() {
        let mut world = World::new();
        let mut far = Thing::cuboid("far", 100.0, 100.0, 100.0).unwrap();
        far.set_location(Vec3::new(0.0, 0.0, 300.0));
        let far_id = world.add(far);
        let near_id = world.add(Thing::cuboid("near", 20.0, 20.0, 20.0).unwrap());

        let camera = Camera::at(Vec3::new(0.0, 0.0, -500.0));
        let mut renderer = CoverageRenderer::new(Viewport::new(800, 600));
        let map = renderer.render(&world, &camera).unwrap();
        assert_eq!(map.get(400, 300).unwrap().thing, near_id);
        // Off the small cube but inside the big one's silhouette.
        assert_eq!(map.get(420, 300).unwrap().thing, far_id);
    }

    #[test]
    fn empty_world_has_empty_map() {
        let mut renderer = CoverageRenderer::new(Viewport::default());
        let map = renderer.render(&World::new(), &Camera::default()).unwrap();
        assert_eq!(map.covered(), 0);
        assert_eq!((map.width, map.height), (0, 0));
        assert!(map.get(0, 0).is_none());
    }

    #[test]
    fn geometry_off_screen_is_clipped() {
        let mut world = World::new();
        let mut cube = Thing::cuboid("cube", 100.0, 100.0, 100.0).unwrap();
        cube.set_location(Vec3::new(5_000.0, 0.0, 0.0));
        world.add(cube);
        let camera = Camera::at(Vec3::new(0.0, 0.0, -500.0));
        let mut renderer = CoverageRenderer::new(Viewport::new(800, 600));
        let map = renderer.render(&world, &camera).unwrap();
        assert_eq!(map.covered(), 0);
    }
}
