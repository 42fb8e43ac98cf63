mod cancel;
mod cluster_regions;

pub use cancel::CancelToken;
pub use cluster_regions::ClusterRegions;

/// Default number of clustering iterations.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Default clustering seed.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Parameters controlling region clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterParams {
    /// Number of regions `K`.
    pub region_count: usize,
    /// Fixed number of assign/update iterations.
    pub iterations: usize,
    /// Seed for centroid sampling and re-seeding.
    pub seed: u64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            region_count: crate::regions::FOOT_LOCATIONS.len(),
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl ClusterParams {
    /// Sets the number of regions.
    #[must_use]
    pub fn with_region_count(mut self, region_count: usize) -> Self {
        self.region_count = region_count;
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
