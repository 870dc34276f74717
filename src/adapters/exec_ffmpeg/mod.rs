//! FFmpeg execution adapter
//!
//! Spawns the `ffmpeg` binary for both loop paths. The engine's stdout and
//! stderr are passed through untouched so its progress and diagnostics reach
//! the user directly; only the exit status is interpreted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::adapters::locate_binary;
use crate::adapters::toml_config::EngineSettings;
use crate::domain::errors::DomainError;
use crate::domain::graph::FilterGraph;
use crate::error::{VloopError, VloopResult};
use crate::ports::EnginePort;

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FfmpegAdapter {
    program: PathBuf,
    quality: u8,
    overwrite: bool,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            program: locate_binary(settings.ffmpeg.as_deref(), "ffmpeg"),
            quality: settings.quality,
            overwrite: settings.overwrite,
        }
    }

    /// Options shared by both paths
    fn common_args(&self) -> Vec<OsString> {
        let overwrite = if self.overwrite { "-y" } else { "-n" };
        vec!["-hide_banner".into(), overwrite.into()]
    }

    /// Arguments for the concat demuxer path
    pub fn concat_args(&self, list_file: &Path, output: &Path) -> Vec<OsString> {
        let mut args = self.common_args();
        args.extend(["-f", "concat", "-safe", "0", "-i"].map(OsString::from));
        args.push(list_file.as_os_str().to_owned());
        args.push("-an".into());
        args.push("-qscale:v".into());
        args.push(self.quality.to_string().into());
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Arguments for the filter graph path; the graph must be well formed
    pub fn filter_graph_args(
        &self,
        input: &Path,
        graph: &FilterGraph,
        output: &Path,
    ) -> VloopResult<Vec<OsString>> {
        graph.validate()?;
        let terminal = graph.terminal().ok_or_else(|| {
            DomainError::MalformedGraph("graph has no terminal output".to_string())
        })?;

        let mut args = self.common_args();
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
        args.push("-an".into());
        args.push("-filter_complex".into());
        args.push(graph.to_filter_complex().into());
        args.push("-map".into());
        args.push(terminal.to_string().into());
        args.push(output.as_os_str().to_owned());
        Ok(args)
    }

    /// Run the engine to completion and map its exit status
    fn run(&self, args: Vec<OsString>, output: &Path) -> VloopResult<()> {
        let program = self.program.display().to_string();
        debug!(program = %program, ?args, "Running ffmpeg");

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| VloopError::EngineSpawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(VloopError::Engine {
                program,
                status,
                output: output.to_path_buf(),
            });
        }

        info!(output = %output.display(), "ffmpeg finished");
        Ok(())
    }
}

impl EnginePort for FfmpegAdapter {
    fn run_concat(&self, list_file: &Path, output: &Path) -> VloopResult<()> {
        let args = self.concat_args(list_file, output);
        self.run(args, output)
    }

    fn run_filter_graph(&self, input: &Path, graph: &FilterGraph, output: &Path) -> VloopResult<()> {
        let args = self.filter_graph_args(input, graph, output)?;
        self.run(args, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{Filter, Pad, Statement, TransitionGraphBuilder};

    fn adapter(overwrite: bool) -> FfmpegAdapter {
        FfmpegAdapter {
            program: PathBuf::from("ffmpeg"),
            quality: 0,
            overwrite,
        }
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_concat_args() {
        let args = adapter(false).concat_args(
            Path::new("/tmp/clipXYZ"),
            Path::new("out/clip_loop-3.mp4"),
        );
        assert_eq!(
            strings(&args),
            vec![
                "-hide_banner",
                "-n",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "/tmp/clipXYZ",
                "-an",
                "-qscale:v",
                "0",
                "out/clip_loop-3.mp4",
            ]
        );
    }

    #[test]
    fn test_filter_graph_args_map_terminal_label() {
        let graph = TransitionGraphBuilder::default()
            .build_cross_fade(3, 5, 15)
            .unwrap();
        let args = adapter(true)
            .filter_graph_args(Path::new("clip.mov"), &graph, Path::new("clip_loop-3.mp4"))
            .unwrap();
        let args = strings(&args);

        assert_eq!(&args[..5], &["-hide_banner", "-y", "-i", "clip.mov", "-an"]);
        assert_eq!(args[5], "-filter_complex");
        assert_eq!(args[6], graph.to_filter_complex());
        assert_eq!(&args[7..], &["-map", "[output]", "clip_loop-3.mp4"]);
    }

    #[test]
    fn test_malformed_graph_never_reaches_engine() {
        let mut graph = FilterGraph::new();
        graph.push(Statement::chain(
            Pad::link("nowhere"),
            vec![Filter::Fifo],
            Pad::link("output"),
        ));
        let err = adapter(false)
            .run_filter_graph(Path::new("clip.mov"), &graph, Path::new("out.mp4"))
            .unwrap_err();
        assert!(matches!(err, VloopError::Domain(DomainError::MalformedGraph(_))));
    }

    #[test]
    fn test_missing_engine_is_spawn_error() {
        let engine = FfmpegAdapter {
            program: PathBuf::from("vloop-no-such-ffmpeg"),
            quality: 0,
            overwrite: false,
        };
        let err = engine
            .run_concat(Path::new("list.txt"), Path::new("out.mp4"))
            .unwrap_err();
        assert!(matches!(err, VloopError::EngineSpawn { .. }));
    }
}
