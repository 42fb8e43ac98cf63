use crate::math::{distance_squared, Point3};
use crate::surface::VertexStore;

/// Resolves a surface point to the index of the nearest vertex.
///
/// Brute-force scan over squared distances; the lowest index wins ties.
/// Picks come from discrete pointer events, so `O(N)` per pick is fine.
pub struct PickVertex {
    point: Point3,
}

impl PickVertex {
    /// Creates a new `PickVertex` query.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Executes the query, returning the nearest vertex index, or `None` when
    /// the store has no vertices.
    #[must_use]
    pub fn execute(&self, store: &VertexStore) -> Option<usize> {
        nearest_vertex(store.positions(), &self.point)
    }
}

pub(crate) fn nearest_vertex(positions: &[Point3], point: &Point3) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in positions.iter().enumerate() {
        let d = distance_squared(p, point);
        if best.map_or(true, |(_, best_dist)| d < best_dist) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
