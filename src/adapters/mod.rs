// Adapters - External system implementations

use std::path::{Path, PathBuf};

use tracing::debug;

pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FfmpegAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::VloopConfig;

/// Resolve an engine binary: the configured path, else PATH lookup, else the bare name
pub fn locate_binary(configured: Option<&Path>, name: &str) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }

    match which::which(name) {
        Ok(path) => {
            debug!("Found {} at {}", name, path.display());
            path
        }
        Err(_) => {
            debug!("{} not found on PATH, using the bare name", name);
            PathBuf::from(name)
        }
    }
}
