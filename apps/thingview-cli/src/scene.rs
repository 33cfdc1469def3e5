//! Scene configuration: which Things to place and where the camera sits.
//!
//! Scene files are JSON:
//!
//! ```json
//! {
//!   "camera": { "position": [150.0, 150.0, -300.0], "zoom": 100.0 },
//!   "look_at": [0.0, 0.0, 0.0],
//!   "things": [
//!     { "name": "cube", "shape": { "cuboid": [100.0, 100.0, 100.0] } },
//!     { "name": "teapot", "shape": { "obj": "models/teapot.obj" }, "position": [0.0, 80.0, 0.0] }
//!   ]
//! }
//! ```
//!
//! `obj` paths are resolved relative to the scene file.

use anyhow::Context;
use glam::Vec3;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thingview_assets::ModelStore;
use thingview_common::Transform;
use thingview_kernel::{Thing, World};
use thingview_render::Camera;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Cuboid([f32; 3]),
    Obj(PathBuf),
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneThing {
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation_degrees: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub camera: Camera,
    /// Point the camera turns toward after it is placed.
    #[serde(default)]
    pub look_at: Option<Vec3>,
    pub things: Vec<SceneThing>,
}

/// A ready-to-render world and camera.
#[derive(Debug, Clone)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl SceneFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scene {}", path.display()))
    }

    /// Build the World, loading `.obj` models relative to `base_dir`.
    pub fn build(&self, base_dir: &Path) -> anyhow::Result<Scene> {
        let mut store = ModelStore::new();
        let mut world = World::new();
        for entry in &self.things {
            let mut thing = match &entry.shape {
                Shape::Cuboid([x, y, z]) => Thing::cuboid(entry.name.clone(), *x, *y, *z)
                    .with_context(|| format!("building cuboid '{}'", entry.name))?,
                Shape::Obj(rel) => {
                    let path = base_dir.join(rel);
                    let id = store
                        .load(&path)
                        .with_context(|| format!("loading model {}", path.display()))?;
                    store.instantiate(id, entry.name.clone())?
                }
            };
            thing.transform = Transform {
                scale: entry.scale,
                ..Transform::from_euler_degrees(entry.position, entry.rotation_degrees)
            };
            world.add(thing);
        }
        let mut camera = self.camera;
        if let Some(target) = self.look_at {
            camera.look_at(target);
        }
        camera.validate().context("scene camera")?;
        tracing::info!(
            things = world.len(),
            faces = world.face_count(),
            models = store.len(),
            "scene built"
        );
        Ok(Scene { world, camera })
    }
}

impl Scene {
    /// Load and build a scene file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        SceneFile::load(path)?.build(base)
    }

    /// A 100-unit cube at the origin, seen from above and to the side.
    pub fn demo() -> anyhow::Result<Self> {
        let mut world = World::new();
        world.add(Thing::cuboid("cube", 100.0, 100.0, 100.0)?);
        let camera = Camera::at(Vec3::new(150.0, 150.0, -300.0)).looking_at(Vec3::ZERO);
        Ok(Self { world, camera })
    }

    /// A single `.obj` model with the camera framed on its bounds.
    pub fn from_obj(path: &Path) -> anyhow::Result<Self> {
        let mut store = ModelStore::new();
        let id = store
            .load(path)
            .with_context(|| format!("loading model {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".into());
        let thing = store.instantiate(id, name)?;
        let (centre, extent) = thing
            .bounds()
            .map(|b| (b.midpoint(), b.size().max_element().max(1.0)))
            .unwrap_or((Vec3::ZERO, 1.0));
        let mut world = World::new();
        world.add(thing);
        let camera = Camera::at(centre + Vec3::new(extent, extent, -2.0 * extent)).looking_at(centre);
        Ok(Self { world, camera })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn demo_scene_has_one_visible_cube() {
        let scene = Scene::demo().unwrap();
        assert_eq!(scene.world.len(), 1);
        assert!(scene.camera.validate().is_ok());
    }

    #[test]
    fn scene_file_with_cuboid_and_obj() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/tri.obj"), TRIANGLE).unwrap();
        let scene_path = dir.path().join("scene.json");
        std::fs::write(
            &scene_path,
            r#"{
                "camera": { "position": [0.0, 0.0, -400.0] },
                "look_at": [0.0, 0.0, 0.0],
                "things": [
                    { "name": "box", "shape": { "cuboid": [10.0, 20.0, 30.0] }, "position": [5.0, 0.0, 0.0] },
                    { "name": "tri", "shape": { "obj": "models/tri.obj" }, "scale": [2.0, 2.0, 2.0] },
                    { "name": "tri2", "shape": { "obj": "models/tri.obj" } }
                ]
            }"#,
        )
        .unwrap();

        let scene = Scene::from_file(&scene_path).unwrap();
        let names: Vec<&str> = scene.world.things().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["box", "tri", "tri2"]);
        let things: Vec<&Thing> = scene.world.things().collect();
        assert_eq!(things[0].transform.position, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(things[1].transform.scale, Vec3::splat(2.0));
        assert_eq!(things[2].transform.scale, Vec3::ONE);
        assert_eq!(scene.world.face_count(), 8);
    }

    #[test]
    fn missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        std::fs::write(
            &scene_path,
            r#"{ "things": [ { "name": "ghost", "shape": { "obj": "nope.obj" } } ] }"#,
        )
        .unwrap();
        let err = Scene::from_file(&scene_path).unwrap_err();
        assert!(format!("{err:#}").contains("nope.obj"));
    }

    #[test]
    fn invalid_camera_is_rejected() {
        let file: SceneFile =
            serde_json::from_str(r#"{ "camera": { "fov_degrees": 0.0 }, "things": [] }"#).unwrap();
        assert!(file.build(Path::new(".")).is_err());
    }

    #[test]
    fn obj_scene_frames_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, TRIANGLE).unwrap();
        let scene = Scene::from_obj(&path).unwrap();
        assert_eq!(scene.world.things().next().unwrap().name, "tri");
        let centre = Vec3::new(0.5, 0.5, 0.0);
        let view = scene.camera.to_view(centre);
        assert!(view.x.abs() < 1e-3 && view.y.abs() < 1e-3 && view.z > 0.0);
    }
}
