use crate::packager::PackagerError;

/// Error type for bundle builds.
///
/// Every variant is terminal for the attempt: the worker records the
/// message on the job and moves on.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Filesystem failure while staging, copying, or reading artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The packaging step failed.
    #[error(transparent)]
    Packager(#[from] PackagerError),

    /// An artifact payload could not be encoded.
    #[error("Failed to encode artifact: {0}")]
    Encode(#[from] serde_json::Error),
}
