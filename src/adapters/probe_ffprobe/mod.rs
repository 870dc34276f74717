//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` once per clip and reads the container duration from its
//! JSON report.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use crate::adapters::locate_binary;
use crate::adapters::toml_config::EngineSettings;
use crate::error::{VloopError, VloopResult};
use crate::ports::ProbePort;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FfprobeAdapter {
    program: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            program: locate_binary(settings.ffprobe.as_deref(), "ffprobe"),
        }
    }

    /// Arguments asking for the container duration as JSON
    pub fn args(file_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-v", "error", "-show_entries", "format=duration", "-of", "json"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(file_path.as_os_str().to_owned());
        args
    }

    /// Extract whole seconds from an ffprobe JSON report
    pub fn parse_duration(report: &str) -> Result<u32, String> {
        let report: ProbeReport =
            serde_json::from_str(report).map_err(|e| format!("unreadable ffprobe output: {}", e))?;

        let raw = report
            .format
            .and_then(|format| format.duration)
            .ok_or_else(|| "no duration reported".to_string())?;

        let seconds: f64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("duration '{}' is not a number", raw))?;

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(format!("duration '{}' is out of range", raw));
        }

        Ok(seconds.floor().min(f64::from(u32::MAX)) as u32)
    }
}

impl ProbePort for FfprobeAdapter {
    fn clip_duration(&self, file_path: &Path) -> VloopResult<u32> {
        debug!(program = %self.program.display(), file = %file_path.display(), "Probing duration");

        let output = Command::new(&self.program)
            .args(Self::args(file_path))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| VloopError::Probe {
                path: file_path.to_path_buf(),
                message: format!("failed to run {}: {}", self.program.display(), e),
            })?;

        if !output.status.success() {
            return Err(VloopError::Probe {
                path: file_path.to_path_buf(),
                message: format!(
                    "ffprobe exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let seconds = Self::parse_duration(&String::from_utf8_lossy(&output.stdout)).map_err(
            |message| VloopError::Probe {
                path: file_path.to_path_buf(),
                message,
            },
        )?;

        debug!(file = %file_path.display(), seconds, "Probed duration");
        Ok(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_drops_fraction() {
        let report = r#"{ "format": { "duration": "15.967000" } }"#;
        assert_eq!(FfprobeAdapter::parse_duration(report), Ok(15));
    }

    #[test]
    fn test_parse_duration_missing_field() {
        assert!(FfprobeAdapter::parse_duration(r#"{ "format": {} }"#).is_err());
        assert!(FfprobeAdapter::parse_duration("{}").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(FfprobeAdapter::parse_duration("not json").is_err());
        for duration in ["N/A", "-3.0", "NaN"] {
            let report = format!(r#"{{ "format": {{ "duration": "{}" }} }}"#, duration);
            assert!(FfprobeAdapter::parse_duration(&report).is_err(), "{}", duration);
        }
    }

    #[test]
    fn test_args_end_with_file() {
        let args = FfprobeAdapter::args(Path::new("clips/a b.mp4"));
        assert_eq!(args.first(), Some(&OsString::from("-v")));
        assert_eq!(args.last(), Some(&OsString::from("clips/a b.mp4")));
    }

    #[test]
    fn test_missing_binary_is_a_probe_error() {
        let probe = FfprobeAdapter {
            program: PathBuf::from("vloop-no-such-ffprobe"),
        };
        let err = probe.clip_duration(Path::new("clip.mp4")).unwrap_err();
        assert!(matches!(err, VloopError::Probe { .. }));
        assert!(!err.is_fatal());
    }
}
