use glam::Vec3;

/// A 3-component vector. Magnitude is `length()`, addition is `+`.
pub type Vector = Vec3;

/// Converts coordinate triples into vectors.
pub fn vectors_from(coords: &[[f32; 3]]) -> Vec<Vector> {
    coords.iter().map(|c| Vec3::from_array(*c)).collect()
}
