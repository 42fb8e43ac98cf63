use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use super::Mark;

/// A change in annotation state, emitted after it has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationEvent {
    /// A previously unmarked vertex was marked.
    VertexMarked(Mark),
    /// Every vertex and region was unmarked.
    Cleared,
    /// A new model replaced the previous one; all state starts unmarked.
    ModelReplaced {
        vertex_count: usize,
        region_count: usize,
    },
}

/// Receives annotation changes, e.g. to recolor rendered geometry.
pub trait AnnotationObserver: Send {
    /// Called once per applied change, in order.
    fn on_event(&mut self, event: &AnnotationEvent);
}

/// Forwards events to a channel, for renderers that drain on their own loop.
/// A disconnected receiver is ignored.
impl AnnotationObserver for Sender<AnnotationEvent> {
    fn on_event(&mut self, event: &AnnotationEvent) {
        let _ = self.send(*event);
    }
}

/// Lets the caller keep a handle to an observer it registered.
/// A poisoned lock skips the event.
impl<T: AnnotationObserver> AnnotationObserver for Arc<Mutex<T>> {
    fn on_event(&mut self, event: &AnnotationEvent) {
        if let Ok(mut inner) = self.lock() {
            inner.on_event(event);
        }
    }
}
