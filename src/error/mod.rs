//! Error handling module for vloop

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for vloop operations
#[derive(Error, Debug)]
pub enum VloopError {
    /// Planning or graph construction rejected the request
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Input is missing or does not look like a video
    #[error("Not a video file: {}", path.display())]
    NotAVideo { path: PathBuf },

    /// Path cannot be written into a text concat list
    #[error("Path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    /// Duration probe failed
    #[error("Failed to probe {}: {message}", path.display())]
    Probe { path: PathBuf, message: String },

    /// Engine could not be started
    #[error("Failed to start {program}: {source}")]
    EngineSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Engine ran and exited unsuccessfully
    #[error("{program} exited with {status} while writing {}", output.display())]
    Engine {
        program: String,
        status: ExitStatus,
        output: PathBuf,
    },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VloopError {
    /// Whether the error should stop the whole batch instead of one clip
    pub fn is_fatal(&self) -> bool {
        match self {
            VloopError::Domain(err) => err.is_fatal(),
            VloopError::Config { .. } => true,
            _ => false,
        }
    }
}

/// Result type alias for vloop operations
pub type VloopResult<T> = std::result::Result<T, VloopError>;
