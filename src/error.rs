use thiserror::Error;

/// Top-level error type for the annotation engine.
#[derive(Debug, Error)]
pub enum PainmapError {
    #[error(transparent)]
    InvalidSurface(#[from] SurfaceError),

    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigurationError),

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors raised while building a vertex store from a loaded surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface has no vertices")]
    Empty,

    #[error("flat position array of length {len} is not a multiple of 3")]
    MalformedPositions { len: usize },

    #[error("vertex {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("triangle index array of length {len} is not a multiple of 3")]
    MalformedIndices { len: usize },

    #[error("triangle index {index} is out of range (surface has {vertex_count} vertices)")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Errors in region or clustering configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("region count {region_count} is outside [1, {vertex_count}]")]
    RegionCountOutOfRange {
        region_count: usize,
        vertex_count: usize,
    },

    #[error("{labels} region labels supplied for {region_count} regions")]
    LabelCountMismatch { labels: usize, region_count: usize },

    #[error("region label list is empty")]
    NoLabels,

    #[error("clustering iteration budget must be at least 1")]
    ZeroIterations,

    #[error("invalid configuration document: {0}")]
    Parse(String),
}

/// Errors raised by annotation writes.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("vertex index {index} is out of range (model has {vertex_count} vertices)")]
    VertexOutOfRange { index: usize, vertex_count: usize },

    #[error("triangle index {index} is out of range (model has {triangle_count} triangles)")]
    TriangleOutOfRange { index: usize, triangle_count: usize },
}

/// Errors related to the model lifecycle of a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no model is loaded")]
    NoModel,

    #[error("clustering was cancelled")]
    Cancelled,

    #[error("clustering worker failed: {0}")]
    WorkerFailed(String),
}

/// Errors raised while writing a report to a sink.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`PainmapError`].
pub type Result<T> = std::result::Result<T, PainmapError>;
