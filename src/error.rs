use thiserror::Error;

/// Errors produced while building, displacing, or shading a terrain grid.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Resolution is zero, not reducible to 1 by repeated halving, or too
    /// large for `u32` face indices.
    #[error("invalid grid size {0}: resolution out of range or not a power of two")]
    InvalidGridSize(u32),

    /// The subdivision queue was drained while the synthesizer still expected work.
    #[error("dequeue called on an empty work queue")]
    EmptyQueue,

    /// An edge midpoint was reached before any of its axis neighbours held a height.
    #[error("midpoint ({row}, {col}) has no written neighbours")]
    UnseededMidpoint { row: u32, col: u32 },

    /// A vertex is not referenced by any face, so it has no normal.
    #[error("vertex {0} has no incident faces")]
    DegenerateVertex(usize),

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("vertex buffer holds {actual} vertices, lattice expects {expected}")]
    MismatchedGrid { expected: usize, actual: usize },

    #[error("invalid terrain config: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type TerrainResult<T> = Result<T, TerrainError>;
