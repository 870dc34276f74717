//! CLI module for vloop
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{LoopArgs, LoopOptions, PlanArgs};

/// vloop - Video Looper
///
/// Repeats a clip back to back, either a fixed number of times or until a
/// minimum length is reached, optionally cross-fading every join.
#[derive(Parser, Debug)]
#[command(name = "vloop")]
#[command(about = "vloop - Loop a video clip, optionally with cross-fades")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (default: ./vloop.toml when present)
    #[arg(long, global = true, env = "VLOOP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report the computed loop count and filter graph
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Loop one or more video clips
    Loop(LoopArgs),
    /// Show the loop count and filter graph for a clip length without rendering
    Plan(PlanArgs),
}
