/// Total mapping from vertex index to region index.
///
/// Produced by [`ClusterRegions`](crate::operations::clustering::ClusterRegions)
/// for one vertex store and read-only afterwards. Every vertex maps to a
/// region in `[0, K)` and every region owns at least one vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    regions: Vec<usize>,
    region_count: usize,
}

impl ClusterAssignment {
    pub(crate) fn new(regions: Vec<usize>, region_count: usize) -> Self {
        debug_assert!(regions.iter().all(|&r| r < region_count));
        Self {
            regions,
            region_count,
        }
    }

    /// Number of vertices covered.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of regions `K`.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.region_count
    }

    /// Region owning vertex `vertex`, if the vertex exists.
    #[must_use]
    pub fn region_of(&self, vertex: usize) -> Option<usize> {
        self.regions.get(vertex).copied()
    }

    /// The full assignment in vertex order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.regions
    }

    /// Vertices owned by `region`, in ascending order.
    pub fn members(&self, region: usize) -> impl Iterator<Item = usize> + '_ {
        self.regions
            .iter()
            .enumerate()
            .filter(move |&(_, &r)| r == region)
            .map(|(v, _)| v)
    }

    /// Number of vertices owned by each region.
    #[must_use]
    pub fn region_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.region_count];
        for &r in &self.regions {
            sizes[r] += 1;
        }
        sizes
    }
}
