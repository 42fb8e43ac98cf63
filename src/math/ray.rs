use super::{Point3, Vector3, TOLERANCE};

/// A half-line `origin + t * direction` for `t >= 0`.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    /// Creates a new ray. The direction does not need to be normalized.
    #[must_use]
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Creates a ray starting at `origin` and passing through `target`.
    #[must_use]
    pub fn through(origin: Point3, target: Point3) -> Self {
        Self {
            origin,
            direction: target - origin,
        }
    }

    /// Evaluates the ray at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }
}

/// Intersects a ray with the triangle `(a, b, c)`.
///
/// Returns the ray parameter `t` of the hit, or `None` when the ray misses,
/// runs parallel to the triangle's plane, or hits behind its origin. Both
/// triangle windings are accepted.
#[must_use]
pub fn ray_triangle_intersect(ray: &Ray, a: &Point3, b: &Point3, c: &Point3) -> Option<f64> {
    let edge1 = b - a;
    let edge2 = c - a;

    let p = ray.direction.cross(&edge2);
    let det = edge1.dot(&p);
    if det.abs() < TOLERANCE {
        // Parallel to the plane, or degenerate triangle.
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&q) * inv_det;
    (t > TOLERANCE).then_some(t)
}
