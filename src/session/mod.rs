mod background;
mod config;

pub use background::LoadStatus;
pub use config::SessionConfig;

use std::sync::Arc;

use tracing::{info, warn};

use crate::annotation::{AnnotationEvent, AnnotationObserver, AnnotationStore, Mark};
use crate::error::{AnnotationError, ConfigurationError, Result, SessionError};
use crate::math::{Point3, Ray};
use crate::operations::clustering::ClusterRegions;
use crate::operations::export::ExportReport;
use crate::operations::picking::{PickRay, PickVertex, RayHit};
use crate::regions::{ClusterAssignment, RegionLabels};
use crate::report::Report;
use crate::surface::VertexStore;

use background::PendingLoad;

/// A loaded surface together with everything derived from it.
///
/// Replaced as one value, so no reader can see an assignment or annotation
/// state that belongs to a different surface.
struct Model {
    generation: u64,
    surface: Arc<VertexStore>,
    annotations: AnnotationStore,
}

/// Owns the active model and routes user interaction to it.
///
/// A session starts without a model. [`Session::load`] clusters a surface
/// synchronously; [`Session::begin_load`] does the same on a worker thread
/// while the previous model stays usable. Either way the new surface, its
/// region assignment, and a fresh annotation state are installed together.
pub struct Session {
    config: SessionConfig,
    model: Option<Model>,
    pending: Option<PendingLoad>,
    next_generation: u64,
    observers: Vec<Box<dyn AnnotationObserver>>,
    painting: bool,
}

impl Session {
    /// Creates a session without a model.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: None,
            pending: None,
            next_generation: 1,
            observers: Vec::new(),
            painting: false,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Region labels in region order.
    #[must_use]
    pub fn labels(&self) -> &RegionLabels {
        &self.config.labels
    }

    /// Number of regions `K`.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.config.labels.len()
    }

    /// Registers an observer for annotation changes.
    pub fn subscribe<O: AnnotationObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // --- Model lifecycle ---

    /// Clusters `surface` and installs it as the active model.
    ///
    /// Supersedes any background load once clustering succeeds. On error the
    /// previous model, if any, stays active and a background load keeps
    /// running.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::RegionCountOutOfRange`] if the surface
    /// has fewer vertices than there are regions.
    pub fn load(&mut self, surface: VertexStore) -> Result<u64> {
        check_region_count(self.region_count(), surface.vertex_count())?;
        let assignment = ClusterRegions::new(self.config.cluster_params()).execute(&surface)?;
        self.cancel_load();
        let generation = self.take_generation();
        self.install(generation, Arc::new(surface), assignment);
        Ok(generation)
    }

    /// Starts clustering `surface` on a worker thread and returns the
    /// generation it will be installed under.
    ///
    /// A load already in flight is cancelled and its result discarded.
    /// Picks and marks keep going to the previous model until
    /// [`Session::poll_load`] or [`Session::wait_load`] installs this one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::RegionCountOutOfRange`] up front if the
    /// surface has fewer vertices than there are regions, or
    /// [`SessionError::WorkerFailed`] if no thread could be started.
    pub fn begin_load(&mut self, surface: VertexStore) -> Result<u64> {
        check_region_count(self.region_count(), surface.vertex_count())?;
        self.cancel_load();

        let generation = self.take_generation();
        info!(
            generation = generation,
            vertices = surface.vertex_count(),
            "Clustering model in background"
        );
        self.pending = Some(PendingLoad::spawn(
            generation,
            Arc::new(surface),
            self.config.cluster_params(),
        )?);
        Ok(generation)
    }

    /// Installs a finished background load without blocking.
    ///
    /// # Errors
    ///
    /// Returns the clustering error of a failed load; the previous model
    /// stays active.
    pub fn poll_load(&mut self) -> Result<LoadStatus> {
        let finished = match &self.pending {
            None => return Ok(LoadStatus::Idle),
            Some(pending) => pending.is_finished(),
        };
        if finished {
            self.wait_load()
        } else {
            Ok(LoadStatus::Pending)
        }
    }

    /// Blocks until the background load finishes and installs it.
    ///
    /// # Errors
    ///
    /// Same as [`Session::poll_load`].
    pub fn wait_load(&mut self) -> Result<LoadStatus> {
        let Some(pending) = self.pending.take() else {
            return Ok(LoadStatus::Idle);
        };
        let generation = pending.generation;
        let surface = Arc::clone(&pending.surface);
        let assignment = pending.join()?;
        self.install(generation, surface, assignment);
        Ok(LoadStatus::Installed { generation })
    }

    /// Cancels the background load, if any. Its result will never be
    /// installed.
    pub fn cancel_load(&mut self) {
        if let Some(pending) = self.pending.take() {
            warn!(
                generation = pending.generation,
                "Discarding superseded clustering"
            );
            pending.cancel();
        }
    }

    /// Returns `true` while a background load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces the configuration and re-clusters the active model.
    ///
    /// Changing labels changes `K`, so all annotations are reset. A
    /// background load in flight is restarted on its surface with the new
    /// parameters and still replaces the active model once it finishes. On
    /// error both the old configuration and the old model stay in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid, has more regions than the
    /// active or pending surface has vertices, or the restarted worker
    /// cannot be spawned.
    pub fn reconfigure(&mut self, config: SessionConfig) -> Result<()> {
        config.validate()?;
        let restart = self.pending.as_ref().map(|p| Arc::clone(&p.surface));
        if let Some(surface) = &restart {
            check_region_count(config.labels.len(), surface.vertex_count())?;
        }

        let reclustered = match &self.model {
            Some(model) => {
                let surface = Arc::clone(&model.surface);
                let assignment = ClusterRegions::new(config.cluster_params()).execute(&surface)?;
                Some((surface, assignment))
            }
            None => None,
        };

        // The restarted load takes a later generation than the re-clustered
        // active model, so it still supersedes it.
        let active_generation = reclustered.as_ref().map(|_| self.take_generation());
        if let Some(surface) = restart {
            let generation = self.take_generation();
            info!(
                generation = generation,
                vertices = surface.vertex_count(),
                "Restarting background clustering with new configuration"
            );
            let next = PendingLoad::spawn(generation, surface, config.cluster_params())?;
            self.cancel_load();
            self.pending = Some(next);
        }

        self.config = config;
        if let (Some(generation), Some((surface, assignment))) = (active_generation, reclustered) {
            self.install(generation, surface, assignment);
        }
        Ok(())
    }

    fn take_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    fn install(
        &mut self,
        generation: u64,
        surface: Arc<VertexStore>,
        assignment: ClusterAssignment,
    ) {
        let vertex_count = surface.vertex_count();
        let region_count = assignment.region_count();
        self.model = Some(Model {
            generation,
            surface,
            annotations: AnnotationStore::new(assignment),
        });
        self.painting = false;

        info!(
            generation = generation,
            vertices = vertex_count,
            regions = region_count,
            "Installed model"
        );
        self.notify(&AnnotationEvent::ModelReplaced {
            vertex_count,
            region_count,
        });
    }

    // --- Model queries ---

    /// Returns `true` once a model has been installed.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Generation of the active model.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.model.as_ref().map(|m| m.generation)
    }

    /// The active surface.
    #[must_use]
    pub fn surface(&self) -> Option<&VertexStore> {
        self.model.as_ref().map(|m| m.surface.as_ref())
    }

    /// Number of vertices of the active surface, `0` without a model.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.surface().map_or(0, VertexStore::vertex_count)
    }

    /// Region assignment of the active surface.
    #[must_use]
    pub fn assignment(&self) -> Option<&ClusterAssignment> {
        self.annotations().map(AnnotationStore::assignment)
    }

    /// Annotation state of the active surface.
    #[must_use]
    pub fn annotations(&self) -> Option<&AnnotationStore> {
        self.model.as_ref().map(|m| &m.annotations)
    }

    // --- Picking ---

    /// Resolves a surface hit to the nearest vertex. `None` for a miss or
    /// when no model is loaded.
    #[must_use]
    pub fn pick(&self, hit: Option<Point3>) -> Option<usize> {
        let surface = self.surface()?;
        PickVertex::new(hit?).execute(surface)
    }

    /// Casts a ray against the active surface.
    #[must_use]
    pub fn pick_ray(&self, ray: &Ray) -> Option<RayHit> {
        PickRay::new(*ray).execute(self.surface()?)
    }

    // --- Marking ---

    /// Marks `vertex`. Re-marking is a silent no-op returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoModel`] without a model and
    /// [`AnnotationError::VertexOutOfRange`] for an unknown vertex.
    pub fn mark(&mut self, vertex: usize) -> Result<Option<Mark>> {
        let model = self.model.as_mut().ok_or(SessionError::NoModel)?;
        let mark = model.annotations.mark(vertex)?;
        if let Some(mark) = mark {
            self.notify(&AnnotationEvent::VertexMarked(mark));
        }
        Ok(mark)
    }

    /// Marks all three corners of triangle `triangle`, returning the corners
    /// that were not marked before.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoModel`] without a model and
    /// [`AnnotationError::TriangleOutOfRange`] for an unknown triangle.
    pub fn mark_triangle(&mut self, triangle: usize) -> Result<Vec<Mark>> {
        let model = self.model.as_mut().ok_or(SessionError::NoModel)?;
        let corners = *model.surface.triangles().get(triangle).ok_or(
            AnnotationError::TriangleOutOfRange {
                index: triangle,
                triangle_count: model.surface.triangle_count(),
            },
        )?;
        let marks = model.annotations.mark_many(corners.map(|c| c as usize))?;
        for mark in &marks {
            self.notify(&AnnotationEvent::VertexMarked(*mark));
        }
        Ok(marks)
    }

    /// Picks and marks in one step. `None` for a miss, a missing model, or
    /// a vertex that was already marked.
    pub fn click(&mut self, hit: Option<Point3>) -> Option<Mark> {
        let vertex = self.pick(hit)?;
        // Picked indices always belong to the active model.
        self.mark(vertex).ok().flatten()
    }

    /// Starts a paint stroke; [`Session::drag`] marks until
    /// [`Session::release`].
    pub fn press(&mut self) {
        self.painting = true;
    }

    /// Ends the paint stroke.
    pub fn release(&mut self) {
        self.painting = false;
    }

    /// Returns `true` between [`Session::press`] and [`Session::release`].
    #[must_use]
    pub fn is_painting(&self) -> bool {
        self.painting
    }

    /// Pointer movement: marks the picked vertex only while painting.
    pub fn drag(&mut self, hit: Option<Point3>) -> Option<Mark> {
        if self.painting {
            self.click(hit)
        } else {
            None
        }
    }

    /// Unmarks every vertex and region of the active model.
    pub fn clear_all(&mut self) {
        let Some(model) = self.model.as_mut() else {
            return;
        };
        model.annotations.clear_all();
        info!(generation = model.generation, "Cleared all marks");
        self.notify(&AnnotationEvent::Cleared);
    }

    /// Returns `true` if `vertex` of the active model is marked.
    #[must_use]
    pub fn is_marked(&self, vertex: usize) -> bool {
        self.annotations().is_some_and(|a| a.is_marked(vertex))
    }

    /// Per-region marks of the active model; empty without a model.
    #[must_use]
    pub fn region_marks(&self) -> &[bool] {
        self.annotations()
            .map(AnnotationStore::region_marks)
            .unwrap_or_default()
    }

    // --- Export ---

    /// Builds the per-region report. Without a model every region is
    /// reported unmarked.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::LabelCountMismatch`] if the labels and
    /// the model disagree on `K`, which a session never lets happen.
    pub fn export(&self) -> Result<Report> {
        let unmarked;
        let marks = if self.has_model() {
            self.region_marks()
        } else {
            unmarked = vec![false; self.region_count()];
            &unmarked
        };
        let report = ExportReport::new(self.labels(), marks).execute()?;
        info!(marked = report.marked_rows().count(), "Exported report");
        Ok(report)
    }

    fn notify(&mut self, event: &AnnotationEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }
}

fn check_region_count(region_count: usize, vertex_count: usize) -> Result<()> {
    if region_count == 0 || region_count > vertex_count {
        return Err(ConfigurationError::RegionCountOutOfRange {
            region_count,
            vertex_count,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
