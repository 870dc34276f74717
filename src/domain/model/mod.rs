// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::errors::DomainError;


/// Smallest number of play-throughs that still forms a loop
pub const MIN_LOOP_COUNT: u16 = 2;

/// Repeat count used when neither `--count` nor `--length` is given
pub const DEFAULT_LOOP_COUNT: u16 = 3;

/// Cross-fade length used when `--transitionDuration` is not given
pub const DEFAULT_TRANSITION_SECONDS: u16 = 2;

/// Container extension of every loop written by the engine
pub const OUTPUT_EXTENSION: &str = "mp4";

/// How many times a clip should play back to back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopRequest {
    /// Repeat the clip exactly this many times
    FixedCount(u16),
    /// Repeat the clip until the loop lasts at least this many seconds
    TargetDuration { seconds: u32 },
}

impl LoopRequest {
    /// Resolve the `--count` / `--length` flag pair into a single request.
    ///
    /// An explicit count takes precedence. A positive length selects the
    /// target-duration mode. With neither, the default count applies.
    pub fn from_flags(count: Option<u16>, length_minutes: Option<u16>) -> Result<Self, DomainError> {
        let request = match (count, length_minutes) {
            (Some(count), _) => LoopRequest::FixedCount(count),
            (None, Some(minutes)) if minutes > 0 => LoopRequest::target_minutes(minutes),
            (None, _) => LoopRequest::FixedCount(DEFAULT_LOOP_COUNT),
        };

        request.validate()?;
        Ok(request)
    }

    /// Target-duration request expressed in minutes, as `--length` takes it
    pub fn target_minutes(minutes: u16) -> Self {
        LoopRequest::TargetDuration {
            seconds: u32::from(minutes) * 60,
        }
    }

    /// Reject fixed counts below the minimum loop
    pub fn validate(&self) -> Result<(), DomainError> {
        match *self {
            LoopRequest::FixedCount(count) if count < MIN_LOOP_COUNT => Err(DomainError::BadArgs(
                format!("Loop count must be at least {}, got {}", MIN_LOOP_COUNT, count),
            )),
            _ => Ok(()),
        }
    }

    /// Target duration in seconds, if this is a target-duration request
    pub fn target_seconds(&self) -> Option<u32> {
        match *self {
            LoopRequest::FixedCount(_) => None,
            LoopRequest::TargetDuration { seconds } => Some(seconds),
        }
    }

    /// Suffix appended to the input stem when naming the output
    pub fn output_suffix(&self, count: u32) -> String {
        match *self {
            LoopRequest::FixedCount(_) => format!("loop-{}", count),
            LoopRequest::TargetDuration { seconds } if seconds % 60 == 0 => {
                format!("length-{}", seconds / 60)
            }
            LoopRequest::TargetDuration { seconds } => format!("length-{}s", seconds),
        }
    }
}

impl fmt::Display for LoopRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopRequest::FixedCount(count) => write!(f, "{} repeats", count),
            LoopRequest::TargetDuration { seconds } => write!(f, "at least {}s", seconds),
        }
    }
}

/// Cross-fade settings for the join between repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionSpec {
    pub enabled: bool,
    pub seconds: u32,
}

impl TransitionSpec {
    pub fn new(enabled: bool, seconds: u32) -> Self {
        Self { enabled, seconds }
    }

    /// Hard cuts between repeats
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            seconds: u32::from(DEFAULT_TRANSITION_SECONDS),
        }
    }

    /// Seconds overlapped at each join; zero when cross-fading is off
    pub fn effective_seconds(&self) -> u32 {
        if self.enabled {
            self.seconds
        } else {
            0
        }
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::disabled()
    }
}

/// A source video and its duration in whole seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clip {
    pub path: PathBuf,
    /// Probed duration, absent when neither the planner nor the graph needed it
    pub duration_seconds: Option<u32>,
}

impl Clip {
    pub fn new(path: impl Into<PathBuf>, duration_seconds: Option<u32>) -> Self {
        Self {
            path: path.into(),
            duration_seconds,
        }
    }
}

/// Fully resolved work for one input clip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopPlan {
    pub clip: Clip,
    pub request: LoopRequest,
    pub transition: TransitionSpec,
    pub count: u32,
    pub output: PathBuf,
}
