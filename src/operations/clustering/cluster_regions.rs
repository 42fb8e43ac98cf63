use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{ConfigurationError, Result, SessionError};
use crate::math::{distance_squared, Point3, Vector3};
use crate::regions::ClusterAssignment;
use crate::surface::VertexStore;

use super::{CancelToken, ClusterParams};

/// Partitions a surface's vertices into `K` spatially coherent regions.
///
/// Runs k-means on vertex positions for a fixed number of iterations.
/// Centroids start at `K` distinct vertices drawn with a seeded RNG, so the
/// same store and params always give the same assignment. Regions left empty
/// by an assignment step are re-seeded at a random vertex, and any region
/// still empty at the end is handed the vertex farthest from its own
/// centroid. Centroids are discarded; only the assignment is returned.
pub struct ClusterRegions {
    params: ClusterParams,
}

impl ClusterRegions {
    /// Creates a new `ClusterRegions` operation.
    #[must_use]
    pub fn new(params: ClusterParams) -> Self {
        Self { params }
    }

    /// Executes the clustering to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::RegionCountOutOfRange`] if `K` is not in
    /// `[1, N]` and [`ConfigurationError::ZeroIterations`] for an empty
    /// iteration budget.
    pub fn execute(&self, store: &VertexStore) -> Result<ClusterAssignment> {
        self.execute_cancellable(store, &CancelToken::new())
    }

    /// Executes the clustering, checking `cancel` before every iteration.
    ///
    /// # Errors
    ///
    /// Same as [`ClusterRegions::execute`], plus [`SessionError::Cancelled`]
    /// once the token is cancelled.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute_cancellable(
        &self,
        store: &VertexStore,
        cancel: &CancelToken,
    ) -> Result<ClusterAssignment> {
        let ClusterParams {
            region_count: k,
            iterations,
            seed,
        } = self.params;
        let positions = store.positions();
        let n = positions.len();

        if k == 0 || k > n {
            return Err(ConfigurationError::RegionCountOutOfRange {
                region_count: k,
                vertex_count: n,
            }
            .into());
        }
        if iterations == 0 {
            return Err(ConfigurationError::ZeroIterations.into());
        }

        info!(
            vertices = n,
            regions = k,
            iterations = iterations,
            seed = seed,
            "Starting region clustering"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut centroids: Vec<Point3> = rand::seq::index::sample(&mut rng, n, k)
            .iter()
            .map(|i| positions[i])
            .collect();
        let mut regions = vec![0usize; n];

        for iteration in 0..iterations {
            if cancel.is_cancelled() {
                debug!(iteration = iteration, "Clustering cancelled");
                return Err(SessionError::Cancelled.into());
            }

            let moved = assign_to_nearest(positions, &centroids, &mut regions);

            let mut sums = vec![Vector3::zeros(); k];
            let mut counts = vec![0usize; k];
            for (p, &r) in positions.iter().zip(&regions) {
                sums[r] += p.coords;
                counts[r] += 1;
            }

            let mut reseeded = 0;
            for r in 0..k {
                if counts[r] == 0 {
                    centroids[r] = positions[rng.gen_range(0..n)];
                    reseeded += 1;
                } else {
                    centroids[r] = Point3::from(sums[r] / counts[r] as f64);
                }
            }

            debug!(
                iteration = iteration,
                moved = moved,
                reseeded = reseeded,
                "Clustering iteration complete"
            );
        }

        assign_to_nearest(positions, &centroids, &mut regions);
        let filled = fill_empty_regions(positions, &centroids, &mut regions, k);

        info!(filled = filled, "Finished region clustering");

        Ok(ClusterAssignment::new(regions, k))
    }
}

/// Assigns every vertex to its nearest centroid, lowest region index on
/// ties. Returns how many vertices changed region.
fn assign_to_nearest(positions: &[Point3], centroids: &[Point3], regions: &mut [usize]) -> usize {
    regions
        .par_iter_mut()
        .zip(positions.par_iter())
        .map(|(region, p)| {
            let nearest = nearest_centroid(p, centroids);
            let changed = *region != nearest;
            *region = nearest;
            changed
        })
        .filter(|&changed| changed)
        .count()
}

fn nearest_centroid(p: &Point3, centroids: &[Point3]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (r, c) in centroids.iter().enumerate() {
        let d = distance_squared(p, c);
        if d < best_dist {
            best = r;
            best_dist = d;
        }
    }
    best
}

/// Moves one vertex into each empty region.
///
/// The donor is the vertex farthest from its own centroid among regions
/// that keep at least one vertex afterwards. With `K <= N` a donor always
/// exists. Distances are measured against the final centroids, which are
/// not updated as vertices move. Returns the number of regions filled.
fn fill_empty_regions(
    positions: &[Point3],
    centroids: &[Point3],
    regions: &mut [usize],
    k: usize,
) -> usize {
    let mut counts = vec![0usize; k];
    for &r in regions.iter() {
        counts[r] += 1;
    }

    let mut filled = 0;
    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }

        let mut donor: Option<(usize, f64)> = None;
        for (v, &owner) in regions.iter().enumerate() {
            if counts[owner] < 2 {
                continue;
            }
            let d = distance_squared(&positions[v], &centroids[owner]);
            if donor.map_or(true, |(_, best)| d > best) {
                donor = Some((v, d));
            }
        }
        let Some((v, _)) = donor else {
            break;
        };

        debug!(region = empty, vertex = v, "Re-seeding empty region");
        counts[regions[v]] -= 1;
        counts[empty] = 1;
        regions[v] = empty;
        filled += 1;
    }
    filled
}
