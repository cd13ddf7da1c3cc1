use thiserror::Error;

/// Degenerate-geometry errors.
///
/// These indicate invalid input; callers must fix the geometry rather than
/// retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("convex polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polygon has (near-)zero area")]
    ZeroArea,

    #[error("vertices are not in convex position")]
    NotConvex,

    #[error("repeated vertex at index {0}")]
    DuplicateVertex(usize),
}
