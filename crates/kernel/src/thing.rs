use crate::KernelError;
use crate::face::{Bounds3, Face};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thingview_common::{ThingId, Transform, vectors_from};

/// A renderable polyhedral object: vertices in local space plus faces over them.
///
/// Deserialized Things go through [`Thing::add_face`], so faces loaded from
/// data obey the same index checks as faces built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThingData")]
pub struct Thing {
    id: ThingId,
    pub name: String,
    pub transform: Transform,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

/// Unvalidated wire form of a [`Thing`].
#[derive(Deserialize)]
struct ThingData {
    id: ThingId,
    name: String,
    transform: Transform,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl TryFrom<ThingData> for Thing {
    type Error = KernelError;

    fn try_from(data: ThingData) -> Result<Self, KernelError> {
        let mut thing = Thing::with_id(data.id, data.name);
        thing.transform = data.transform;
        thing.add_vertices(data.vertices);
        for face in data.faces {
            thing.add_face(face.vertices)?;
        }
        Ok(thing)
    }
}

impl Thing {
    /// Empty Thing with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(ThingId::new(), name)
    }

    pub fn with_id(id: ThingId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transform: Transform::default(),
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Rectangular prism centred on the origin.
    ///
    /// A zero extent is allowed and yields a flat box.
    pub fn cuboid(name: impl Into<String>, x: f32, y: f32, z: f32) -> Result<Self, KernelError> {
        if [x, y, z].iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(KernelError::InvalidDimensions { x, y, z });
        }
        let (x2, y2, z2) = (x / 2.0, y / 2.0, z / 2.0);
        let mut thing = Self::new(name);
        thing.add_vertices(vectors_from(&[
            [x2, y2, z2],
            [x2, y2, -z2],
            [x2, -y2, z2],
            [x2, -y2, -z2],
            [-x2, y2, z2],
            [-x2, y2, -z2],
            [-x2, -y2, z2],
            [-x2, -y2, -z2],
        ]));
        // Each quad in perimeter order.
        for quad in [
            [0, 1, 3, 2],
            [0, 1, 5, 4],
            [4, 5, 7, 6],
            [2, 3, 7, 6],
            [0, 2, 6, 4],
            [1, 3, 7, 5],
        ] {
            thing.add_face(quad)?;
        }
        Ok(thing)
    }

    pub fn id(&self) -> ThingId {
        self.id
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Add a vertex (relative to the Thing's origin). Returns its index.
    pub fn add_vertex(&mut self, location: Vec3) -> usize {
        self.vertices.push(location);
        self.vertices.len() - 1
    }

    pub fn add_vertices<I: IntoIterator<Item = Vec3>>(&mut self, vertices: I) {
        self.vertices.extend(vertices);
    }

    /// Add a face over existing vertices. Returns the face index.
    pub fn add_face<I: IntoIterator<Item = usize>>(&mut self, indices: I) -> Result<usize, KernelError> {
        let vertices: Vec<usize> = indices.into_iter().collect();
        if vertices.len() < 3 {
            return Err(KernelError::FaceTooSmall {
                len: vertices.len(),
            });
        }
        let len = self.vertices.len();
        if let Some(&index) = vertices.iter().find(|&&i| i >= len) {
            return Err(KernelError::VertexOutOfRange { index, len });
        }
        self.faces.push(Face { vertices });
        Ok(self.faces.len() - 1)
    }

    pub fn set_location(&mut self, location: Vec3) {
        self.transform.position = location;
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.transform.rotation = orientation;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.transform.position += delta;
    }

    /// Vertices mapped through the Thing's transform.
    pub fn world_vertices(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|&v| self.transform.apply(v)).collect()
    }

    /// Local-space bounds.
    pub fn bounds(&self) -> Option<Bounds3> {
        Bounds3::from_points(self.vertices.iter().copied())
    }
}
