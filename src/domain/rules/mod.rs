// Domain rules - Repeat count planning

use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;


/// Works out how many play-throughs a loop request needs
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopPlanner {
    verbose: bool,
}

impl LoopPlanner {
    /// Create a planner; `verbose` promotes its diagnostics to info level
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Compute the number of repeats for `request`.
    ///
    /// A fixed count is returned untouched. For a target duration every repeat
    /// after the first adds `clip - transition` seconds and the last one keeps
    /// its `transition` tail, so the loop lasts `n * (clip - t) + t` seconds and
    /// the smallest `n` reaching the target is `ceil((target - t) / (clip - t))`.
    /// Plain concatenation uses the same formula with `t = 0`.
    pub fn compute_repeat_count(
        &self,
        clip_seconds: f64,
        request: &LoopRequest,
        transition_seconds: u32,
    ) -> Result<u32, DomainError> {
        let target = match *request {
            LoopRequest::FixedCount(count) => return Ok(u32::from(count)),
            LoopRequest::TargetDuration { .. } => request.target_seconds().unwrap_or(0),
        };

        let transition = f64::from(transition_seconds);
        if clip_seconds <= transition {
            return Err(DomainError::DegenerateClip {
                clip_seconds,
                transition_seconds,
            });
        }

        if target == 0 {
            return Err(DomainError::InvalidTarget(
                "required length must be greater than zero".to_string(),
            ));
        }

        let numerator = f64::from(target) - transition;
        let denominator = clip_seconds - transition;
        let repeats = (numerator / denominator).ceil().max(1.0) as u32;

        if self.verbose {
            info!(target, clip_seconds, transition_seconds, repeats, "Loop {} times", repeats);
        } else {
            debug!(target, clip_seconds, transition_seconds, repeats, "Computed repeat count");
        }

        Ok(repeats)
    }

    /// Seconds of video a loop of `count` repeats produces
    pub fn looped_duration(clip_seconds: f64, count: u32, transition_seconds: u32) -> f64 {
        let transition = f64::from(transition_seconds);
        f64::from(count) * (clip_seconds - transition) + transition
    }
}
