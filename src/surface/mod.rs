use crate::error::SurfaceError;
use crate::math::Point3;

/// Immutable vertex positions of a loaded triangulated surface.
///
/// Vertices are addressed by their index in `[0, N)`. Triangles reference
/// vertices by index and are kept only so rays can be cast against the
/// surface; clustering and nearest-vertex picking work on positions alone.
///
/// Once built the store is read-only. Loading another model means building
/// a new store, never mutating this one.
#[derive(Debug, Clone)]
pub struct VertexStore {
    positions: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl VertexStore {
    /// Builds a store from a triangle soup: every consecutive triple of
    /// positions forms one triangle. Trailing positions that do not complete
    /// a triangle are kept as addressable vertices.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Empty`] for zero positions and
    /// [`SurfaceError::NonFinite`] if any coordinate is NaN or infinite.
    pub fn from_positions(positions: Vec<Point3>) -> Result<Self, SurfaceError> {
        validate_positions(&positions)?;
        let triangles = soup_triangles(positions.len());
        Ok(Self {
            positions,
            triangles,
        })
    }

    /// Builds a store from a flat `[x0, y0, z0, x1, y1, z1, ..]` array.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::MalformedPositions`] if the length is not a
    /// multiple of 3, plus the errors of [`VertexStore::from_positions`].
    pub fn from_flat(coords: &[f64]) -> Result<Self, SurfaceError> {
        if coords.len() % 3 != 0 {
            return Err(SurfaceError::MalformedPositions { len: coords.len() });
        }
        let positions = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::from_positions(positions)
    }

    /// Builds a store that keeps an indexed surface's shared vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the positions are empty or non-finite, the index
    /// array is not a multiple of 3, or an index is out of range.
    pub fn from_indexed(positions: Vec<Point3>, indices: &[u32]) -> Result<Self, SurfaceError> {
        validate_positions(&positions)?;
        let triangles = indexed_triangles(indices, positions.len())?;
        Ok(Self {
            positions,
            triangles,
        })
    }

    /// Builds a store from an indexed surface, expanding it so that every
    /// triangle corner becomes an independent vertex.
    ///
    /// Vertex `3 * t + c` of the result is corner `c` of triangle `t`.
    ///
    /// # Errors
    ///
    /// Same as [`VertexStore::from_indexed`]. An index array with no
    /// triangles yields [`SurfaceError::Empty`].
    pub fn from_indexed_expanded(
        positions: &[Point3],
        indices: &[u32],
    ) -> Result<Self, SurfaceError> {
        validate_positions(positions)?;
        let triangles = indexed_triangles(indices, positions.len())?;
        let expanded: Vec<Point3> = triangles
            .iter()
            .flat_map(|tri| tri.iter().map(move |&i| positions[i as usize]))
            .collect();
        Self::from_positions(expanded)
    }

    /// Number of vertices `N`.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// All vertex positions in index order.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Position of vertex `index`, if it exists.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<&Point3> {
        self.positions.get(index)
    }

    /// Triangles as vertex index triples.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Corner positions of triangle `index`, if it exists.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<[Point3; 3]> {
        let [a, b, c] = *self.triangles.get(index)?;
        Some([
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ])
    }

    /// Positions as a flat array of length `3N`.
    #[must_use]
    pub fn flat_positions(&self) -> Vec<f64> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }
}

fn validate_positions(positions: &[Point3]) -> Result<(), SurfaceError> {
    if positions.is_empty() {
        return Err(SurfaceError::Empty);
    }
    if let Some(index) = positions
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(SurfaceError::NonFinite { index });
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn soup_triangles(vertex_count: usize) -> Vec<[u32; 3]> {
    (0..vertex_count / 3)
        .map(|t| {
            let base = (t * 3) as u32;
            [base, base + 1, base + 2]
        })
        .collect()
}

fn indexed_triangles(indices: &[u32], vertex_count: usize) -> Result<Vec<[u32; 3]>, SurfaceError> {
    if indices.len() % 3 != 0 {
        return Err(SurfaceError::MalformedIndices { len: indices.len() });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(SurfaceError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok(indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect())
}
