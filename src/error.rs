// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FenceError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("no project found with the name: {0}")]
    ProjectNotFound(String),

    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("no such tool: {0}")]
    UnknownTool(String),

    #[error("invalid settings json")]
    InvalidSettings,

    #[error("could not read project settings: {0}")]
    SettingsUnreadable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, FenceError>;

impl FenceError {
    /// Wraps an I/O error with the path that produced it.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        FenceError::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to FenceError::Io with unknown path.
impl From<std::io::Error> for FenceError {
    fn from(source: std::io::Error) -> Self {
        FenceError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
