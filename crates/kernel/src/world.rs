use crate::thing::Thing;
use glam::Vec3;
use std::collections::BTreeMap;
use thingview_common::{ThingId, Transform};

/// The id-keyed set of Things being rendered.
///
/// Lookup goes through a BTreeMap; iteration follows insertion order, which
/// renderers use as the tie-break between faces at equal depth.
#[derive(Debug, Clone, Default)]
pub struct World {
    things: BTreeMap<ThingId, Thing>,
    order: Vec<ThingId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Thing, returning its id.
    ///
    /// Re-adding an id that is already present replaces the Thing in place
    /// and keeps its original position in the iteration order.
    pub fn add(&mut self, thing: Thing) -> ThingId {
        let id = thing.id();
        if self.things.insert(id, thing).is_none() {
            self.order.push(id);
            tracing::debug!(%id, "thing added");
        } else {
            tracing::debug!(%id, "thing replaced");
        }
        id
    }

    pub fn remove(&mut self, id: ThingId) -> Option<Thing> {
        let removed = self.things.remove(&id);
        if removed.is_some() {
            self.order.retain(|o| *o != id);
            tracing::debug!(%id, "thing removed");
        }
        removed
    }

    pub fn get(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(&id)
    }

    pub fn get_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.get_mut(&id)
    }

    pub fn contains(&self, id: ThingId) -> bool {
        self.things.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.things.len()
    }

    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }

    /// Things in insertion order.
    pub fn things(&self) -> impl Iterator<Item = &Thing> + '_ {
        self.order.iter().filter_map(|id| self.things.get(id))
    }

    /// Total number of faces across all Things.
    pub fn face_count(&self) -> usize {
        self.things.values().map(|t| t.faces().len()).sum()
    }

    /// Replace a Thing's transform. Returns false if the id is unknown.
    pub fn set_transform(&mut self, id: ThingId, transform: Transform) -> bool {
        match self.things.get_mut(&id) {
            Some(thing) => {
                thing.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Move a Thing by `delta`. Returns false if the id is unknown.
    pub fn translate(&mut self, id: ThingId, delta: Vec3) -> bool {
        match self.things.get_mut(&id) {
            Some(thing) => {
                thing.translate(delta);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(name: &str) -> Thing {
        Thing::cuboid(name, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert!(w.is_empty());
        assert_eq!(w.len(), 0);
        assert_eq!(w.things().count(), 0);
    }

    #[test]
    fn add_and_remove() {
        let mut w = World::new();
        let id = w.add(cube("a"));
        assert_eq!(w.len(), 1);
        assert!(w.contains(id));
        assert_eq!(w.get(id).unwrap().name, "a");

        let removed = w.remove(id);
        assert!(removed.is_some());
        assert!(w.is_empty());
        assert!(w.remove(id).is_none());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut w = World::new();
        let names = ["zeta", "alpha", "mid", "beta"];
        for n in names {
            w.add(cube(n));
        }
        let seen: Vec<&str> = w.things().map(|t| t.name.as_str()).collect();
        assert_eq!(seen, names);
    }

    #[test]
    fn readding_keeps_original_position() {
        let mut w = World::new();
        let first = cube("first");
        let first_id = first.id();
        w.add(first);
        w.add(cube("second"));

        let mut replacement = Thing::with_id(first_id, "first-v2");
        replacement.add_vertex(Vec3::ZERO);
        w.add(replacement);

        assert_eq!(w.len(), 2);
        let seen: Vec<&str> = w.things().map(|t| t.name.as_str()).collect();
        assert_eq!(seen, ["first-v2", "second"]);
    }

    #[test]
    fn removal_drops_from_order() {
        let mut w = World::new();
        let a = w.add(cube("a"));
        w.add(cube("b"));
        w.remove(a);
        let seen: Vec<&str> = w.things().map(|t| t.name.as_str()).collect();
        assert_eq!(seen, ["b"]);
    }

    #[test]
    fn set_transform_and_translate() {
        let mut w = World::new();
        let id = w.add(cube("a"));
        assert!(w.set_transform(id, Transform::at(Vec3::new(1.0, 2.0, 3.0))));
        assert!(w.translate(id, Vec3::new(0.0, -1.0, 0.0)));
        assert_eq!(w.get(id).unwrap().transform.position, Vec3::new(1.0, 1.0, 3.0));

        let missing = ThingId::new();
        assert!(!w.set_transform(missing, Transform::default()));
        assert!(!w.translate(missing, Vec3::ONE));
    }

    #[test]
    fn face_count_sums_things() {
        let mut w = World::new();
        w.add(cube("a"));
        w.add(cube("b"));
        assert_eq!(w.face_count(), 12);
    }
}
