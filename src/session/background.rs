use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{Result, SessionError};
use crate::operations::clustering::{CancelToken, ClusterParams, ClusterRegions};
use crate::regions::ClusterAssignment;
use crate::surface::VertexStore;

/// Progress of a background model load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No load is in flight.
    Idle,
    /// Clustering is still running; the previous model stays active.
    Pending,
    /// The load finished and its model is now active.
    Installed { generation: u64 },
}

/// Clustering running on a worker thread for a model not yet installed.
pub(crate) struct PendingLoad {
    pub(crate) generation: u64,
    pub(crate) surface: Arc<VertexStore>,
    cancel: CancelToken,
    handle: JoinHandle<Result<ClusterAssignment>>,
}

impl PendingLoad {
    pub(crate) fn spawn(
        generation: u64,
        surface: Arc<VertexStore>,
        params: ClusterParams,
    ) -> Result<Self> {
        let cancel = CancelToken::new();
        let worker_surface = Arc::clone(&surface);
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("painmap-cluster-{generation}"))
            .spawn(move || {
                ClusterRegions::new(params).execute_cancellable(&worker_surface, &worker_cancel)
            })
            .map_err(|e| SessionError::WorkerFailed(e.to_string()))?;

        Ok(Self {
            generation,
            surface,
            cancel,
            handle,
        })
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the worker at its next iteration boundary. The thread is left
    /// detached and its result is never read.
    pub(crate) fn cancel(self) {
        self.cancel.cancel();
    }

    /// Blocks until the worker finishes.
    pub(crate) fn join(self) -> Result<ClusterAssignment> {
        self.handle
            .join()
            .map_err(|_| SessionError::WorkerFailed("clustering thread panicked".into()))?
    }
}
