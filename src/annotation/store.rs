use tracing::debug;

use crate::error::AnnotationError;
use crate::regions::ClusterAssignment;

/// The effect of marking a vertex that was not yet marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// The vertex that was marked.
    pub vertex: usize,
    /// The region owning the vertex.
    pub region: usize,
    /// `true` if this mark turned the region's aggregate flag on.
    pub region_newly_marked: bool,
}

/// Per-vertex marked flags plus the per-region aggregate derived from them.
///
/// `region_marks()[r]` is `true` exactly when some vertex assigned to `r`
/// has been marked since construction or the last [`clear_all`]. The
/// aggregate is updated incrementally on every mark and reset by
/// [`clear_all`]; it never turns back off otherwise.
///
/// [`clear_all`]: AnnotationStore::clear_all
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    assignment: ClusterAssignment,
    marked: Vec<bool>,
    region_marks: Vec<bool>,
    marked_count: usize,
}

impl AnnotationStore {
    /// Creates a store with every vertex unmarked.
    #[must_use]
    pub fn new(assignment: ClusterAssignment) -> Self {
        let marked = vec![false; assignment.vertex_count()];
        let region_marks = vec![false; assignment.region_count()];
        Self {
            assignment,
            marked,
            region_marks,
            marked_count: 0,
        }
    }

    /// The vertex to region assignment the aggregate is folded through.
    #[must_use]
    pub fn assignment(&self) -> &ClusterAssignment {
        &self.assignment
    }

    /// Marks `vertex`. Marking an already marked vertex is a no-op and
    /// returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::VertexOutOfRange`] for an unknown vertex.
    pub fn mark(&mut self, vertex: usize) -> Result<Option<Mark>, AnnotationError> {
        let region = self
            .assignment
            .region_of(vertex)
            .ok_or(AnnotationError::VertexOutOfRange {
                index: vertex,
                vertex_count: self.marked.len(),
            })?;

        if self.marked[vertex] {
            return Ok(None);
        }
        self.marked[vertex] = true;
        self.marked_count += 1;

        let region_newly_marked = !self.region_marks[region];
        self.region_marks[region] = true;
        if region_newly_marked {
            debug!(vertex = vertex, region = region, "Region marked");
        }

        Ok(Some(Mark {
            vertex,
            region,
            region_newly_marked,
        }))
    }

    /// Marks several vertices, returning the marks that changed state.
    ///
    /// Indices are validated before anything is marked, so an invalid index
    /// leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AnnotationError::VertexOutOfRange`] for an unknown vertex.
    pub fn mark_many<I>(&mut self, vertices: I) -> Result<Vec<Mark>, AnnotationError>
    where
        I: IntoIterator<Item = usize>,
    {
        let vertices: Vec<usize> = vertices.into_iter().collect();
        if let Some(&index) = vertices.iter().find(|&&v| v >= self.marked.len()) {
            return Err(AnnotationError::VertexOutOfRange {
                index,
                vertex_count: self.marked.len(),
            });
        }

        let mut marks = Vec::new();
        for v in vertices {
            if let Some(mark) = self.mark(v)? {
                marks.push(mark);
            }
        }
        Ok(marks)
    }

    /// Unmarks every vertex and every region.
    pub fn clear_all(&mut self) {
        self.marked.fill(false);
        self.region_marks.fill(false);
        self.marked_count = 0;
    }

    /// Returns `true` if `vertex` is marked. Unknown vertices are unmarked.
    #[must_use]
    pub fn is_marked(&self, vertex: usize) -> bool {
        self.marked.get(vertex).copied().unwrap_or(false)
    }

    /// Per-vertex flags in vertex order.
    #[must_use]
    pub fn vertex_marks(&self) -> &[bool] {
        &self.marked
    }

    /// Number of marked vertices.
    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.marked_count
    }

    /// Marked vertices in ascending order.
    pub fn marked_vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.marked
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(|(v, _)| v)
    }

    /// Per-region aggregate flags in region order.
    #[must_use]
    pub fn region_marks(&self) -> &[bool] {
        &self.region_marks
    }

    /// Recomputes the region aggregate from the vertex flags.
    #[must_use]
    pub fn fold_region_marks(&self) -> Vec<bool> {
        let mut marks = vec![false; self.assignment.region_count()];
        for v in self.marked_vertices() {
            marks[self.assignment.as_slice()[v]] = true;
        }
        marks
    }
}
