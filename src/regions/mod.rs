pub mod assignment;
pub mod labels;

pub use assignment::ClusterAssignment;
pub use labels::{RegionLabels, FOOT_LOCATIONS};
