use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Reading, writing, truncating or renaming the data file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The data file exists but does not decode into a record map.
    #[error("corrupt state in {}: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not mint an unused id after {0} attempts")]
    IdExhausted(usize),
}

impl ServiceError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        Self::CorruptState { path: path.to_path_buf(), reason: reason.into() }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptState { .. })
    }
}
