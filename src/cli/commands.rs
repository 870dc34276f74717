//! Command implementations

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use crate::adapters::{FfmpegAdapter, FfprobeAdapter, VloopConfig};
use crate::app::loop_interactor::repeat_count;
use crate::app::{LoopInteractor, LoopSettings};
use crate::cli::args::{LoopArgs, PlanArgs};
use crate::domain::graph::TransitionGraphBuilder;
use crate::domain::model::{LoopRequest, TransitionSpec};
use crate::domain::rules::LoopPlanner;
use crate::utils::path::resolve_output_directory;

/// Dry-run result printed by `plan`
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub clip_seconds: u32,
    pub request: LoopRequest,
    pub transition: TransitionSpec,
    pub count: u32,
    pub looped_seconds: f64,
    pub filter_complex: Option<String>,
}

/// Execute the loop command
pub fn run_loop(args: LoopArgs, config: &VloopConfig, verbose: bool) -> Result<()> {
    let request = args.options.request().context("Invalid loop options")?;
    let transition = args.options.transition();

    let output_directory = resolve_output_directory(args.output_directory.as_deref())
        .context("Failed to prepare output directory")?;

    let mut engine_settings = config.engine.clone();
    engine_settings.overwrite |= args.overwrite;

    info!(
        inputs = args.inputs.len(),
        %request,
        cross_fade = transition.enabled,
        output_directory = %output_directory.display(),
        "Starting loop operation"
    );

    let interactor = LoopInteractor::new(
        Arc::new(FfprobeAdapter::new(&engine_settings)),
        Arc::new(FfmpegAdapter::new(&engine_settings)),
        LoopSettings {
            request,
            transition,
            output_directory,
            verbose,
        },
    );
    let report = interactor.run(&args.inputs);

    for plan in report.succeeded() {
        println!("{}", plan.output.display());
    }

    let failed = report.failed().count();
    if failed > 0 {
        bail!(
            "{} of {} clips could not be looped",
            failed,
            report.outcomes.len()
        );
    }

    info!("Loop operation completed successfully");
    Ok(())
}

/// Execute the plan command
pub fn plan(args: PlanArgs, verbose: bool) -> Result<()> {
    let request = args.options.request().context("Invalid loop options")?;
    let transition = args.options.transition();

    let planner = LoopPlanner::new(verbose);
    let count = repeat_count(&planner, args.clip_length, &request, &transition)
        .context("Failed to compute loop count")?;

    let filter_complex = if transition.enabled {
        let graph = TransitionGraphBuilder::new(verbose)
            .build_cross_fade(count, transition.seconds, args.clip_length)
            .context("Failed to build cross-fade graph")?;
        Some(graph.to_filter_complex())
    } else {
        None
    };

    let summary = PlanSummary {
        clip_seconds: args.clip_length,
        request,
        transition,
        count,
        looped_seconds: LoopPlanner::looped_duration(
            f64::from(args.clip_length),
            count,
            transition.effective_seconds(),
        ),
        filter_complex,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize plan to JSON")?;
        println!("{}", json);
    } else {
        display_plan(&summary);
    }
    Ok(())
}

fn display_plan(summary: &PlanSummary) {
    println!("Clip length: {}s", summary.clip_seconds);
    println!("Request: {}", summary.request);
    if summary.transition.enabled {
        println!("Cross-fade: {}s", summary.transition.seconds);
    } else {
        println!("Cross-fade: off");
    }
    println!("Loop count: {}", summary.count);
    println!("Loop length: {}s", summary.looped_seconds);
    if let Some(graph) = &summary.filter_complex {
        println!("Filter graph: {}", graph);
    }
}
