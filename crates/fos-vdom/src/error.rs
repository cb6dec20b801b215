//! Engine errors

use crate::surface::SurfaceError;

/// Result type for shadow tree operations
pub type VdomResult<T> = Result<T, VdomError>;

/// Shadow tree errors
#[derive(Debug, thiserror::Error)]
pub enum VdomError {
    /// Path or identifier is unknown to the store or the surface
    #[error("not found: {0}")]
    NotFound(String),

    /// Path is committed but has no live surface handle
    #[error("{0} is recorded but not mirrored on the surface")]
    DetachedFromSurface(String),

    /// Surface returned nothing where a result was required
    #[error("unexpected empty result from surface: {0}")]
    Unexpected(String),

    /// Operation needs a live handle (or callback) that is absent
    #[error("precondition missing: {0}")]
    PreconditionMissing(String),

    /// A record is already committed at this path
    #[error("path already committed: {0}")]
    AlreadyExists(String),

    /// Identifier cannot be used as a path segment
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// Name outside the configured vocabulary
    #[error("unsupported {kind}: {name}")]
    Unsupported { kind: &'static str, name: String },

    /// Event channel closed
    #[error("event router is not running")]
    RouterUnavailable,

    /// Router thread could not be spawned
    #[error("failed to start event router: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SurfaceError> for VdomError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::NotFound(what) => VdomError::NotFound(what),
            SurfaceError::Unexpected(what) => VdomError::Unexpected(what),
            SurfaceError::PreconditionMissing(what) => VdomError::PreconditionMissing(what),
        }
    }
}
