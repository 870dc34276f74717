//! Cross-fade loop graph construction

use tracing::{debug, info, warn};

use super::{FadeDirection, Filter, FilterGraph, Pad, Statement};
use crate::domain::errors::DomainError;
use crate::domain::model::MIN_LOOP_COUNT;

/// Label of the stream the engine should map to the output file
pub const TERMINAL_LABEL: &str = "output";

/// Pixel format with an alpha plane, required for alpha fades
const ALPHA_PIX_FMT: &str = "yuva420p";

/// Why a buildable graph will still loop badly, if it will
pub fn transition_warning(transition: u32, clip_len: u32) -> Option<&'static str> {
    if transition == 0 {
        Some("Transition is zero seconds, cross-fade segment is empty")
    } else if clip_len < transition.saturating_mul(2) {
        Some("Transition overlaps itself, loop body is empty")
    } else {
        None
    }
}

/// Builds the filter graph that loops a clip with a dissolve at each join
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionGraphBuilder {
    verbose: bool,
}

impl TransitionGraphBuilder {
    /// Create a builder; `verbose` logs the rendered graph at info level
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Build the graph for `count` repeats of a `clip_len` second clip,
    /// dissolving over `transition` seconds at every join.
    ///
    /// The clip is cut into `clip1 = [0, L-t)`, the loop body `clip2 = [t, L-t)`
    /// and `clip3 = [L-t, L)`. The tail `[L-t, L)` fading out is overlaid with
    /// the head `[0, t)` fading in to form the `crossfade` segment. The output
    /// is `clip1`, then `crossfade, clip2` once per extra repeat, then `clip3`.
    pub fn build_cross_fade(
        &self,
        count: u32,
        transition: u32,
        clip_len: u32,
    ) -> Result<FilterGraph, DomainError> {
        if clip_len <= transition {
            return Err(DomainError::DegenerateClip {
                clip_seconds: f64::from(clip_len),
                transition_seconds: transition,
            });
        }
        if count < u32::from(MIN_LOOP_COUNT) {
            return Err(DomainError::BadArgs(format!(
                "Cross-fade loop needs at least {} repeats, got {}",
                MIN_LOOP_COUNT, count
            )));
        }
        if let Some(message) = transition_warning(transition, clip_len) {
            warn!(clip_len, transition, "{}", message);
        }

        let tail_start = clip_len - transition;
        let joins = count - 1;
        let mut graph = FilterGraph::new();

        let segments = [
            ("clip1", 0, tail_start),
            ("clip2", transition, tail_start),
            ("clip3", tail_start, clip_len),
            ("fadeoutsrc", tail_start, clip_len),
            ("fadeinsrc", 0, transition),
        ];
        for (label, start, end) in segments {
            graph.push(Statement::chain(
                Pad::video_input(0),
                vec![Filter::Trim { start, end }, Filter::ResetTimestamps],
                Pad::link(label),
            ));
        }

        for (source, direction, faded) in [
            ("fadeinsrc", FadeDirection::In, "fadein"),
            ("fadeoutsrc", FadeDirection::Out, "fadeout"),
        ] {
            graph.push(Statement::chain(
                Pad::link(source),
                vec![
                    Filter::Format {
                        pix_fmt: ALPHA_PIX_FMT.to_string(),
                    },
                    Filter::Fade {
                        direction,
                        start: 0,
                        duration: transition,
                        alpha: true,
                    },
                ],
                Pad::link(faded),
            ));
        }

        graph
            .push(Statement::chain(
                Pad::link("fadein"),
                vec![Filter::Fifo],
                Pad::link("fadeinfifo"),
            ))
            .push(Statement::chain(
                Pad::link("fadeout"),
                vec![Filter::Fifo],
                Pad::link("fadeoutfifo"),
            ))
            .push(Statement::new(
                vec![Pad::link("fadeoutfifo"), Pad::link("fadeinfifo")],
                vec![Filter::Overlay],
                vec![Pad::link("crossfade")],
            ));

        for (source, prefix) in [("crossfade", "cf"), ("clip2", "cl")] {
            graph.push(Statement::new(
                vec![Pad::link(source)],
                vec![Filter::Split { outputs: joins }],
                (1..=joins).map(|i| Pad::indexed(prefix, i)).collect(),
            ));
        }

        let mut concat_inputs = Vec::with_capacity((count * 2) as usize);
        concat_inputs.push(Pad::link("clip1"));
        for i in 1..=joins {
            concat_inputs.push(Pad::indexed("cf", i));
            concat_inputs.push(Pad::indexed("cl", i));
        }
        concat_inputs.push(Pad::link("clip3"));

        graph.push(Statement::new(
            concat_inputs,
            vec![Filter::Concat {
                segments: count * 2,
                video: 1,
                audio: 0,
            }],
            vec![Pad::link(TERMINAL_LABEL)],
        ));

        if self.verbose {
            info!(count, transition, clip_len, "filter_complex is\n{}", graph);
        } else {
            debug!(
                count,
                transition,
                clip_len,
                statements = graph.statements().len(),
                "Built cross-fade graph"
            );
        }

        Ok(graph)
    }
}
