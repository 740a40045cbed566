//! Error types for the relationship store.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The memory file exists but could not be read as a snapshot.
    #[error("corrupt state at {}: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },

    /// Score outside [0.0, 1.0] (or NaN).
    #[error("invalid score {0}: must lie in [0.0, 1.0]")]
    InvalidScore(f64),

    /// Write-through to the memory file failed. In-memory state is kept.
    #[error("failed to persist state to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
