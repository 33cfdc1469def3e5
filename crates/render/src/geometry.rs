use glam::Vec2;

/// Axis-aligned screen rectangle in pixels (`top < bottom`, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self {
            left: min.x,
            top: min.y,
            right: max.x,
            bottom: max.y,
        })
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Overlap of two rectangles, if any.
    pub fn intersection(self, other: Self) -> Option<Self> {
        let r = Self {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (r.left <= r.right && r.top <= r.bottom).then_some(r)
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection(*other).is_some()
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// A projected face outline in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2 {
    pub points: Vec<Vec2>,
}

impl Polygon2 {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }

    /// Even-odd point-in-polygon test (horizontal ray crossing count).
    pub fn contains(&self, p: Vec2) -> bool {
        let pts = &self.points;
        if pts.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = pts.len() - 1;
        for i in 0..pts.len() {
            let (a, b) = (pts[i], pts[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon2 {
        Polygon2::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn square_contains_interior_only() {
        let sq = square();
        assert!(sq.contains(Vec2::new(5.0, 5.0)));
        assert!(sq.contains(Vec2::new(0.5, 9.5)));
        assert!(!sq.contains(Vec2::new(-1.0, 5.0)));
        assert!(!sq.contains(Vec2::new(5.0, 11.0)));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // A "U" shape: the notch between the arms is not inside.
        let u = Polygon2::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 6.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(9.0, 0.0),
            Vec2::new(9.0, 9.0),
            Vec2::new(0.0, 9.0),
        ]);
        assert!(!u.contains(Vec2::new(4.5, 3.0)));
        assert!(u.contains(Vec2::new(1.5, 3.0)));
        assert!(u.contains(Vec2::new(4.5, 7.5)));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        let line = Polygon2::new(vec![Vec2::ZERO, Vec2::ONE]);
        assert!(!line.contains(Vec2::new(0.5, 0.5)));
        assert!(Polygon2::new(vec![]).bounds().is_none());
    }

    #[test]
    fn bounds_and_rect_ops() {
        let b = square().bounds().unwrap();
        assert_eq!((b.width(), b.height()), (10.0, 10.0));
        let other = Rect {
            left: 5.0,
            top: 5.0,
            right: 20.0,
            bottom: 20.0,
        };
        let u = b.union(other);
        assert_eq!((u.left, u.bottom), (0.0, 20.0));
        let i = b.intersection(other).unwrap();
        assert_eq!((i.left, i.top, i.right, i.bottom), (5.0, 5.0, 10.0, 10.0));
        assert!(b.contains(Vec2::new(10.0, 10.0)));

        let far = Rect {
            left: 50.0,
            top: 50.0,
            right: 60.0,
            bottom: 60.0,
        };
        assert!(!b.intersects(&far));
    }
}
