use std::ops::Range;

use super::{AnnotationEvent, AnnotationObserver};

/// RGB color with components in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Highlight applied to marked vertices.
pub const MARKED_COLOR: Rgb = [1.0, 0.0, 0.0];

/// Per-vertex color attribute kept in sync with annotation events.
///
/// Holds a flat `[r0, g0, b0, r1, ..]` buffer of length `3N` that a renderer
/// can upload as a vertex color attribute. Marked vertices take
/// [`MARKED_COLOR`]; a clear or model replacement restores the base color.
#[derive(Debug, Clone)]
pub struct VertexColors {
    base: Rgb,
    buffer: Vec<f32>,
    dirty: bool,
}

impl VertexColors {
    /// Creates a buffer of `vertex_count` vertices painted `base`.
    #[must_use]
    pub fn new(vertex_count: usize, base: Rgb) -> Self {
        Self {
            base,
            buffer: base.repeat(vertex_count),
            dirty: true,
        }
    }

    /// The flat color buffer.
    #[must_use]
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Color of `vertex`, if it exists.
    #[must_use]
    pub fn color(&self, vertex: usize) -> Option<Rgb> {
        let c = self.buffer.get(slot_range(vertex)?)?;
        Some([c[0], c[1], c[2]])
    }

    /// Returns whether the buffer changed since the last call, and resets
    /// the flag. Mirrors a GPU attribute's `needsUpdate`.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn paint(&mut self, vertex: usize, color: Rgb) {
        if let Some(slot) = slot_range(vertex).and_then(|range| self.buffer.get_mut(range)) {
            slot.copy_from_slice(&color);
            self.dirty = true;
        }
    }
}

/// Buffer range of `vertex`, `None` if it cannot be addressed.
fn slot_range(vertex: usize) -> Option<Range<usize>> {
    let start = vertex.checked_mul(3)?;
    Some(start..start.checked_add(3)?)
}

impl AnnotationObserver for VertexColors {
    fn on_event(&mut self, event: &AnnotationEvent) {
        match *event {
            AnnotationEvent::VertexMarked(mark) => self.paint(mark.vertex, MARKED_COLOR),
            AnnotationEvent::Cleared => {
                self.buffer = self.base.repeat(self.buffer.len() / 3);
                self.dirty = true;
            }
            AnnotationEvent::ModelReplaced { vertex_count, .. } => {
                self.buffer = self.base.repeat(vertex_count);
                self.dirty = true;
            }
        }
    }
}
