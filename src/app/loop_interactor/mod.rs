// Loop interactor - Orchestrates the video loop use case

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, info_span, warn};

use crate::domain::errors::DomainError;
use crate::domain::graph::TransitionGraphBuilder;
use crate::domain::model::*;
use crate::domain::rules::LoopPlanner;
use crate::error::{VloopError, VloopResult};
use crate::ports::*;
use crate::utils::concat_list::ConcatList;
use crate::utils::media::{expand_inputs, is_video_file};
use crate::utils::path::output_path;

#[cfg(test)]
mod tests;

/// Settings shared by every clip in one invocation
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub request: LoopRequest,
    pub transition: TransitionSpec,
    pub output_directory: PathBuf,
    pub verbose: bool,
}

/// Result of processing one input
#[derive(Debug)]
pub struct ClipOutcome {
    pub input: PathBuf,
    pub result: VloopResult<LoopPlan>,
}

/// Results for a whole batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ClipOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &LoopPlan> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &VloopError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.input.as_path(), e)))
    }

    /// True when every input produced a loop
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Repeat count for one clip, never below the minimum loop
pub fn repeat_count(
    planner: &LoopPlanner,
    clip_seconds: u32,
    request: &LoopRequest,
    transition: &TransitionSpec,
) -> Result<u32, DomainError> {
    let count = planner.compute_repeat_count(
        f64::from(clip_seconds),
        request,
        transition.effective_seconds(),
    )?;

    let minimum = u32::from(MIN_LOOP_COUNT);
    if count < minimum {
        warn!(
            count,
            minimum, "Target is reached without looping, using the minimum loop"
        );
        return Ok(minimum);
    }
    Ok(count)
}

/// Interactor for the video loop use case
pub struct LoopInteractor {
    probe_port: Arc<dyn ProbePort>,
    engine_port: Arc<dyn EnginePort>,
    settings: LoopSettings,
    planner: LoopPlanner,
    builder: TransitionGraphBuilder,
}

impl LoopInteractor {
    /// Create new loop interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        engine_port: Arc<dyn EnginePort>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            probe_port,
            engine_port,
            planner: LoopPlanner::new(settings.verbose),
            builder: TransitionGraphBuilder::new(settings.verbose),
            settings,
        }
    }

    /// Loop every input in order, one engine run at a time.
    ///
    /// A failing clip is logged and recorded and the remaining clips still run,
    /// unless the error is fatal to the whole invocation.
    pub fn run(&self, inputs: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();

        for input in expand_inputs(inputs) {
            let result = self.process_clip(&input);
            let fatal = match &result {
                Err(err) if err.is_fatal() => {
                    error!(file = %input.display(), "Aborting batch: {}", err);
                    true
                }
                Err(err) => {
                    error!(file = %input.display(), "Skipping clip: {}", err);
                    false
                }
                Ok(_) => false,
            };
            report.outcomes.push(ClipOutcome { input, result });
            if fatal {
                break;
            }
        }

        info!(
            total = report.outcomes.len(),
            failed = report.failed().count(),
            "Batch finished"
        );
        report
    }

    /// Plan and render the loop for a single clip
    pub fn process_clip(&self, input: &Path) -> VloopResult<LoopPlan> {
        let _span = info_span!("clip", file = %input.display()).entered();

        let plan = self.plan_clip(input)?;
        info!(
            count = plan.count,
            output = %plan.output.display(),
            cross_fade = plan.transition.enabled,
            "Creating loop"
        );

        if plan.transition.enabled {
            let clip_seconds = plan.clip.duration_seconds.unwrap_or_default();
            let graph =
                self.builder
                    .build_cross_fade(plan.count, plan.transition.seconds, clip_seconds)?;
            self.engine_port
                .run_filter_graph(&plan.clip.path, &graph, &plan.output)?;
        } else {
            let list = ConcatList::create(&plan.clip.path, plan.count)?;
            self.engine_port.run_concat(list.path(), &plan.output)?;
        }

        Ok(plan)
    }

    /// Resolve the repeat count and output path without touching the engine
    pub fn plan_clip(&self, input: &Path) -> VloopResult<LoopPlan> {
        if !is_video_file(input) {
            return Err(VloopError::NotAVideo {
                path: input.to_path_buf(),
            });
        }

        let request = self.settings.request;
        let transition = self.settings.transition;

        let needs_duration = request.target_seconds().is_some() || transition.enabled;
        let clip_seconds = if needs_duration {
            Some(self.probe_port.clip_duration(input)?)
        } else {
            None
        };

        let count = repeat_count(
            &self.planner,
            clip_seconds.unwrap_or_default(),
            &request,
            &transition,
        )?;
        let output = output_path(
            &self.settings.output_directory,
            input,
            &request.output_suffix(count),
        )?;

        Ok(LoopPlan {
            clip: Clip::new(input, clip_seconds),
            request,
            transition,
            count,
            output,
        })
    }
}
