use crate::math::{ray_triangle_intersect, Point3, Ray};
use crate::surface::VertexStore;

use super::pick_vertex::nearest_vertex;

/// Result of casting a ray against a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The hit point on the surface.
    pub point: Point3,
    /// Ray parameter of the hit.
    pub distance: f64,
    /// Index of the triangle that was hit.
    pub triangle: usize,
    /// Vertex nearest to the hit point.
    pub vertex: usize,
}

/// Casts a ray against every triangle of a surface and resolves the nearest
/// hit to a vertex.
pub struct PickRay {
    ray: Ray,
}

impl PickRay {
    /// Creates a new `PickRay` query.
    #[must_use]
    pub fn new(ray: Ray) -> Self {
        Self { ray }
    }

    /// Executes the query. Returns `None` when the ray hits no triangle.
    ///
    /// On equal hit distances the lower triangle index wins.
    #[must_use]
    pub fn execute(&self, store: &VertexStore) -> Option<RayHit> {
        let positions = store.positions();

        let mut best: Option<(usize, f64)> = None;
        for (index, &[a, b, c]) in store.triangles().iter().enumerate() {
            let Some(t) = ray_triangle_intersect(
                &self.ray,
                &positions[a as usize],
                &positions[b as usize],
                &positions[c as usize],
            ) else {
                continue;
            };
            if best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((index, t));
            }
        }

        let (triangle, distance) = best?;
        let point = self.ray.at(distance);
        let vertex = nearest_vertex(positions, &point)?;

        Some(RayHit {
            point,
            distance,
            triangle,
            vertex,
        })
    }
}
