//! Error types for ffreco-core.

use thiserror::Error;

/// Result type alias for ffreco operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for ffreco operations.
///
/// Physics rejections (out-of-window masses, empty candidate pools) are not
/// errors; stages express them as `Option` or empty collections.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// PDG code not present in the particle table.
    #[error("unknown particle: PDG code {0}")]
    UnknownParticle(i32),

    /// Named geometry constant could not be resolved.
    #[error("geometry constant not found: {0}")]
    MissingConstant(String),

    /// Event supplies clusters for a region the configuration does not define.
    #[error("event has {found} cluster collections but {configured} regions are configured")]
    RegionMismatch { found: usize, configured: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
