pub mod colors;
pub mod observer;
pub mod store;

pub use colors::{Rgb, VertexColors, MARKED_COLOR};
pub use observer::{AnnotationEvent, AnnotationObserver};
pub use store::{AnnotationStore, Mark};
