//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::domain::errors::DomainError;
use crate::domain::model::{
    LoopRequest, TransitionSpec, DEFAULT_TRANSITION_SECONDS, MIN_LOOP_COUNT,
};

fn parse_count(s: &str) -> Result<u16, String> {
    number_range(s, MIN_LOOP_COUNT, u16::MAX)
}

/// Loop shape options shared by `loop` and `plan`
#[derive(Args, Debug, Clone)]
pub struct LoopOptions {
    /// Number of times the clip is played (at least 2, default 3)
    #[arg(short, long, value_parser = parse_count)]
    pub count: Option<u16>,

    /// Minimum loop length in minutes; ignored when --count is given
    #[arg(short, long)]
    pub length: Option<u16>,

    /// Cross-fade the end of each repeat into the start of the next
    #[arg(short = 'x', long, alias = "withCrossFade")]
    pub with_cross_fade: bool,

    /// Cross-fade length in seconds
    #[arg(
        short = 't',
        long,
        alias = "transitionDuration",
        default_value_t = u32::from(DEFAULT_TRANSITION_SECONDS)
    )]
    pub transition_duration: u32,
}

impl LoopOptions {
    /// Resolve `--count` / `--length` into a loop request
    pub fn request(&self) -> Result<LoopRequest, DomainError> {
        LoopRequest::from_flags(self.count, self.length)
    }

    pub fn transition(&self) -> TransitionSpec {
        TransitionSpec::new(self.with_cross_fade, self.transition_duration)
    }
}

/// Arguments for the loop command
#[derive(Args, Debug)]
pub struct LoopArgs {
    #[command(flatten)]
    pub options: LoopOptions,

    /// Directory for the looped files (default: current directory)
    #[arg(short, long, alias = "outputDirectory")]
    pub output_directory: Option<PathBuf>,

    /// Replace existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Video files, or directories whose videos should all be looped
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Clip length in whole seconds
    #[arg(long)]
    pub clip_length: u32,

    #[command(flatten)]
    pub options: LoopOptions,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
