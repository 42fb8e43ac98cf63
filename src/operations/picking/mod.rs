mod pick_ray;
mod pick_vertex;

pub use pick_ray::{PickRay, RayHit};
pub use pick_vertex::PickVertex;
