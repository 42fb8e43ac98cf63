pub mod ray;

pub use ray::{ray_triangle_intersect, Ray};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Squared Euclidean distance between two points.
#[must_use]
#[inline]
pub fn distance_squared(a: &Point3, b: &Point3) -> f64 {
    (a - b).norm_squared()
}
