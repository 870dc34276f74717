//! Path utilities for output naming and placement

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::model::OUTPUT_EXTENSION;
use crate::error::{VloopError, VloopResult};

/// File name without directory or extension
pub fn input_stem(path: &Path) -> VloopResult<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| VloopError::NotAVideo {
            path: path.to_path_buf(),
        })
}

/// `<dir>/<stem>_<suffix>.mp4`
pub fn output_path(directory: &Path, input: &Path, suffix: &str) -> VloopResult<PathBuf> {
    let stem = input_stem(input)?;
    Ok(directory.join(format!("{}_{}.{}", stem, suffix, OUTPUT_EXTENSION)))
}

/// Resolve the output directory, creating it when missing.
///
/// `None` means the current working directory.
pub fn resolve_output_directory(requested: Option<&Path>) -> VloopResult<PathBuf> {
    match requested {
        None => Ok(std::env::current_dir()?),
        Some(dir) if dir.as_os_str().is_empty() => Ok(std::env::current_dir()?),
        Some(dir) => {
            if !dir.is_dir() {
                info!("Creating output directory: {}", dir.display());
                std::fs::create_dir_all(dir)?;
            }
            Ok(dir.to_path_buf())
        }
    }
}
