//! Region annotation engine for 3D anatomical surfaces.
//!
//! A loaded surface is partitioned into `K` named regions by clustering its
//! vertex positions. Pointer hits resolve to the nearest vertex, marked
//! vertices fold into per-region flags, and the flags export as a
//! per-region report. [`session::Session`] ties these together for one
//! active model at a time.

pub mod annotation;
pub mod error;
pub mod math;
pub mod operations;
pub mod regions;
pub mod report;
pub mod session;
pub mod surface;

pub use error::{PainmapError, Result};
