//! vloop - Video Looper
//!
//! Loops a video clip a fixed number of times or up to a minimum length,
//! optionally cross-fading each repeat into the next. The heavy lifting is done
//! by an external `ffmpeg`; durations come from `ffprobe`.
//!
//! # Usage
//!
//! ```bash
//! vloop loop -c 4 clip.mp4
//! vloop loop -l 10 -x -t 3 -o loops/ clips/
//! vloop plan --clip-length 15 -l 1 -x --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use vloop::adapters::{tracing_log, VloopConfig};
use vloop::cli::{commands, Cli, Commands};

/// Main entry point for the vloop CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Precedence: CLI > Env > File > Defaults
    let mut config =
        VloopConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    config.logging.json |= cli.json_logs;
    config.validate().context("Invalid configuration")?;

    tracing_log::init(&config.logging);
    info!("Starting vloop {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Loop(args) => {
            info!("Executing loop command");
            commands::run_loop(args, &config, cli.verbose)?;
        }
        Commands::Plan(args) => {
            info!("Executing plan command");
            commands::plan(args, cli.verbose)?;
        }
    }

    Ok(())
}
