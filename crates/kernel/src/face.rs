use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds3 {
    /// Bounds of a point set, or `None` when it is empty.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// An ordered polygon over the owning Thing's vertex list.
///
/// Bounds are derived from the vertex slice on demand; nothing is cached on
/// the face itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<usize>,
}

impl Face {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Resolve this face's corners against a vertex list.
    ///
    /// Indices are validated when the face is added to a Thing, so indexing
    /// here cannot go out of range for that Thing's vertices.
    pub fn points<'a>(&'a self, vertices: &'a [Vec3]) -> impl Iterator<Item = Vec3> + 'a {
        self.vertices.iter().map(move |&i| vertices[i])
    }

    pub fn bounds(&self, vertices: &[Vec3]) -> Option<Bounds3> {
        Bounds3::from_points(self.points(vertices))
    }

    /// Centre of the face's bounding box.
    pub fn midpoint(&self, vertices: &[Vec3]) -> Option<Vec3> {
        self.bounds(vertices).map(|b| b.midpoint())
    }
}
