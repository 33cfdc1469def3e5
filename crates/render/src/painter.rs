use crate::RenderError;
use crate::camera::{Camera, Viewport};
use crate::geometry::{Polygon2, Rect};
use crate::projection::Projector;
use glam::Vec3;
use thingview_common::ThingId;
use thingview_kernel::World;

/// One face after projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFace {
    pub thing: ThingId,
    /// Index of the face within its Thing.
    pub face: usize,
    /// Running index over Things (insertion order) then faces; the depth tie-break.
    pub order: usize,
    pub polygon: Polygon2,
    /// Camera-space depth of the face's bounding-box midpoint.
    pub depth: f32,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    pub viewport: Viewport,
    /// Visible faces in painter's order (farthest first).
    pub faces: Vec<ProjectedFace>,
    /// Union of all face bounds.
    pub bounds: Option<Rect>,
    /// Faces dropped for crossing the near or far plane.
    pub culled: usize,
}

/// Sort faces farthest first; equal depths keep insertion order.
///
/// `-0.0` and `0.0` count as the same depth.
pub fn painter_order(mut faces: Vec<ProjectedFace>) -> Vec<ProjectedFace> {
    faces.sort_by(|a, b| {
        (b.depth + 0.0)
            .total_cmp(&(a.depth + 0.0))
            .then(a.order.cmp(&b.order))
    });
    faces
}

/// Project every face of every Thing and order the result for painting.
///
/// A face with any corner in front of `near` or beyond `far` is culled whole.
pub fn project_world(
    world: &World,
    camera: &Camera,
    viewport: Viewport,
) -> Result<FrameGeometry, RenderError> {
    let _span = tracing::debug_span!("project_world").entered();
    let projector = Projector::new(camera, viewport)?;
    let mut faces = Vec::with_capacity(world.face_count());
    let mut culled = 0;
    let mut order = 0;

    for thing in world.things() {
        let view: Vec<Vec3> = thing
            .world_vertices()
            .into_iter()
            .map(|v| projector.to_view(v))
            .collect();
        for (index, face) in thing.faces().iter().enumerate() {
            let seq = order;
            order += 1;
            let Some(bounds) = face.bounds(&view) else {
                continue;
            };
            if bounds.min.z < camera.near || bounds.max.z > camera.far {
                culled += 1;
                continue;
            }
            let points = face
                .points(&view)
                .map(|v| projector.project_view(v).map(|p| p.position))
                .collect::<Result<Vec<_>, _>>()?;
            faces.push(ProjectedFace {
                thing: thing.id(),
                face: index,
                order: seq,
                polygon: Polygon2::new(points),
                depth: bounds.midpoint().z,
            });
        }
    }

    let faces = painter_order(faces);
    let bounds = faces
        .iter()
        .filter_map(|f| f.polygon.bounds())
        .reduce(Rect::union);
    tracing::debug!(visible = faces.len(), culled, "projected world");
    Ok(FrameGeometry {
        viewport,
        faces,
        bounds,
        culled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use thingview_kernel::Thing;

    fn face(order: usize, depth: f32) -> ProjectedFace {
        ProjectedFace {
            thing: ThingId::new(),
            face: order,
            order,
            polygon: Polygon2::new(Vec::new()),
            depth,
        }
    }

    fn cube_scene() -> (World, Camera) {
        let mut world = World::new();
        world.add(Thing::cuboid("cube", 100.0, 100.0, 100.0).unwrap());
        (world, Camera::at(Vec3::new(0.0, 0.0, -500.0)))
    }

    #[test]
    fn farthest_face_is_painted_first() {
        let sorted = painter_order(vec![face(0, 1.0), face(1, 9.0), face(2, 5.0)]);
        let depths: Vec<f32> = sorted.iter().map(|f| f.depth).collect();
        assert_eq!(depths, [9.0, 5.0, 1.0]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let sorted = painter_order(vec![face(3, 2.0), face(0, 2.0), face(2, 7.0), face(1, 2.0)]);
        let orders: Vec<usize> = sorted.iter().map(|f| f.order).collect();
        assert_eq!(orders, [2, 0, 1, 3]);
    }

    #[test]
    fn signed_zero_depths_tie() {
        let sorted = painter_order(vec![face(0, -0.0), face(1, 0.0), face(2, -0.0)]);
        let orders: Vec<usize> = sorted.iter().map(|f| f.order).collect();
        assert_eq!(orders, [0, 1, 2]);
    }

    #[test]
    fn cube_faces_ordered_back_sides_front() {
        let (world, camera) = cube_scene();
        let frame = project_world(&world, &camera, Viewport::new(800, 600)).unwrap();
        assert_eq!(frame.culled, 0);
        let order: Vec<usize> = frame.faces.iter().map(|f| f.face).collect();
        // +z (back, depth 550), four sides tied at 500 in face order, -z (front, 450).
        assert_eq!(order, [4, 0, 1, 2, 3, 5]);
        assert_eq!(frame.faces[0].depth, 550.0);
        assert_eq!(frame.faces[5].depth, 450.0);
    }

    #[test]
    fn front_face_projects_to_expected_square() {
        let (world, camera) = cube_scene();
        let frame = project_world(&world, &camera, Viewport::new(800, 600)).unwrap();
        let front = frame.faces.last().unwrap().polygon.bounds().unwrap();
        let half = 400.0 * 50.0 / 450.0;
        assert!((front.left - (400.0 - half)).abs() < 1e-3);
        assert!((front.right - (400.0 + half)).abs() < 1e-3);
        assert!((front.top - (300.0 - half)).abs() < 1e-3);
        let all = frame.bounds.unwrap();
        assert_eq!(all, front);
    }

    #[test]
    fn ties_across_things_follow_world_order() {
        let mut world = World::new();
        let mut left = Thing::cuboid("left", 10.0, 10.0, 10.0).unwrap();
        left.set_location(Vec3::new(-50.0, 0.0, 0.0));
        let mut right = Thing::cuboid("right", 10.0, 10.0, 10.0).unwrap();
        right.set_location(Vec3::new(50.0, 0.0, 0.0));
        let left_id = world.add(left);
        let right_id = world.add(right);

        let camera = Camera::at(Vec3::new(0.0, 0.0, -200.0));
        let frame = project_world(&world, &camera, Viewport::default()).unwrap();
        // Both back faces sit at the same depth; the first-added Thing paints first.
        assert_eq!(frame.faces[0].thing, left_id);
        assert_eq!(frame.faces[1].thing, right_id);
        assert_eq!(frame.faces[0].depth, frame.faces[1].depth);
    }

    #[test]
    fn faces_crossing_camera_plane_are_culled() {
        let mut world = World::new();
        world.add(Thing::cuboid("around", 100.0, 100.0, 100.0).unwrap());
        // Camera at the centre: only the +z face lies wholly in front of it.
        let frame = project_world(&world, &Camera::default(), Viewport::default()).unwrap();
        assert_eq!(frame.culled, 5);
        assert_eq!(frame.faces.len(), 1);
        assert_eq!(frame.faces[0].face, 4);
    }

    #[test]
    fn empty_world_has_no_bounds() {
        let frame = project_world(&World::new(), &Camera::default(), Viewport::default()).unwrap();
        assert!(frame.faces.is_empty());
        assert!(frame.bounds.is_none());
    }

    #[test]
    fn far_plane_culls() {
        let (world, mut camera) = cube_scene();
        camera.far = 500.0;
        let frame = project_world(&world, &camera, Viewport::default()).unwrap();
        // Only the front face lies entirely within 450..=500.
        assert_eq!(frame.faces.len(), 1);
        assert_eq!(frame.culled, 5);
    }

    #[test]
    fn invalid_camera_is_an_error() {
        let (world, mut camera) = cube_scene();
        camera.fov_degrees = -1.0;
        assert!(matches!(
            project_world(&world, &camera, Viewport::default()),
            Err(RenderError::Projection(_))
        ));
    }

    #[test]
    fn output_is_finite() {
        let (world, camera) = cube_scene();
        let frame = project_world(&world, &camera, Viewport::default()).unwrap();
        for f in &frame.faces {
            assert!(f.depth.is_finite());
            assert!(f.polygon.points.iter().all(|p| p.is_finite()));
        }
    }
}
