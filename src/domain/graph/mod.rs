//! Filter graph intermediate representation
//!
//! A [`FilterGraph`] is an ordered list of [`Statement`]s. Each statement reads
//! one or more pads, runs a chain of filters and writes one or more named pads.
//! The graph is kept typed until it reaches the engine boundary, where
//! [`FilterGraph::to_filter_complex`] renders the textual form the engine's
//! `-filter_complex` option expects.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::domain::errors::DomainError;

pub mod builder;


pub use builder::{TransitionGraphBuilder, TERMINAL_LABEL};

/// Kind of elementary stream selected from an engine input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
}

impl StreamKind {
    fn specifier(self) -> char {
        match self {
            StreamKind::Video => 'v',
            StreamKind::Audio => 'a',
        }
    }
}

/// A connection point between statements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pad {
    /// Stream taken straight from an engine input, e.g. `[0:v]`
    Input { index: usize, kind: StreamKind },
    /// Intermediate stream produced inside the graph
    Link(String),
}

impl Pad {
    pub fn link(name: impl Into<String>) -> Self {
        Pad::Link(name.into())
    }

    pub fn video_input(index: usize) -> Self {
        Pad::Input {
            index,
            kind: StreamKind::Video,
        }
    }

    /// Numbered link such as `cf2`
    pub fn indexed(prefix: &str, index: u32) -> Self {
        Pad::Link(format!("{}{}", prefix, index))
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pad::Input { index, kind } => write!(f, "[{}:{}]", index, kind.specifier()),
            Pad::Link(name) => write!(f, "[{}]", name),
        }
    }
}

/// Direction of an alpha fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// One engine filter with its options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Keep `[start, end)` seconds of the input
    Trim { start: u32, end: u32 },
    /// Rebase timestamps so the stream starts at zero
    ResetTimestamps,
    /// Convert to the given pixel format
    Format { pix_fmt: String },
    Fade {
        direction: FadeDirection,
        start: u32,
        duration: u32,
        alpha: bool,
    },
    /// Unbounded frame queue between producer and consumer
    Fifo,
    /// Composite the second input over the first
    Overlay,
    /// Duplicate the input into `outputs` identical streams
    Split { outputs: u32 },
    /// Join `segments` groups of `video` + `audio` streams end to end
    Concat { segments: u32, video: u32, audio: u32 },
}

impl Filter {
    /// Number of input pads the filter consumes, when fixed by its options
    fn expected_inputs(&self) -> Option<usize> {
        match *self {
            Filter::Overlay => Some(2),
            Filter::Concat {
                segments,
                video,
                audio,
            } => Some((segments * (video + audio)) as usize),
            Filter::Trim { .. }
            | Filter::ResetTimestamps
            | Filter::Format { .. }
            | Filter::Fade { .. }
            | Filter::Fifo
            | Filter::Split { .. } => Some(1),
        }
    }

    /// Number of output pads the filter produces
    fn expected_outputs(&self) -> usize {
        match *self {
            Filter::Split { outputs } => outputs as usize,
            Filter::Concat { video, audio, .. } => (video + audio) as usize,
            _ => 1,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Trim { start, end } => write!(f, "trim=start={}:end={}", start, end),
            Filter::ResetTimestamps => write!(f, "setpts=PTS-STARTPTS"),
            Filter::Format { pix_fmt } => write!(f, "format=pix_fmts={}", pix_fmt),
            Filter::Fade {
                direction,
                start,
                duration,
                alpha,
            } => {
                let t = match direction {
                    FadeDirection::In => "in",
                    FadeDirection::Out => "out",
                };
                write!(f, "fade=t={}:st={}:d={}", t, start, duration)?;
                if *alpha {
                    write!(f, ":alpha=1")?;
                }
                Ok(())
            }
            Filter::Fifo => write!(f, "fifo"),
            Filter::Overlay => write!(f, "overlay"),
            Filter::Split { outputs } => write!(f, "split={}", outputs),
            Filter::Concat {
                segments,
                video,
                audio,
            } => write!(f, "concat=n={}:v={}:a={}", segments, video, audio),
        }
    }
}

/// A filter chain with its labelled inputs and outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub inputs: Vec<Pad>,
    pub filters: Vec<Filter>,
    pub outputs: Vec<Pad>,
}

impl Statement {
    pub fn new(inputs: Vec<Pad>, filters: Vec<Filter>, outputs: Vec<Pad>) -> Self {
        Self {
            inputs,
            filters,
            outputs,
        }
    }

    /// Single-input, single-output chain
    pub fn chain(input: Pad, filters: Vec<Filter>, output: Pad) -> Self {
        Self::new(vec![input], filters, vec![output])
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pad in &self.inputs {
            write!(f, "{}", pad)?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", filter)?;
        }
        for pad in &self.outputs {
            write!(f, "{}", pad)?;
        }
        Ok(())
    }
}

/// Ordered, labelled pipeline of filter statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterGraph {
    statements: Vec<Statement>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) -> &mut Self {
        self.statements.push(statement);
        self
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The single pad produced by the final statement
    pub fn terminal(&self) -> Option<&Pad> {
        match self.statements.last() {
            Some(last) if last.outputs.len() == 1 => last.outputs.first(),
            _ => None,
        }
    }

    /// Number of segments fed into the terminal statement when it is a concat
    pub fn concat_inputs(&self) -> Option<usize> {
        let last = self.statements.last()?;
        match last.filters.last()? {
            Filter::Concat { .. } => Some(last.inputs.len()),
            _ => None,
        }
    }

    /// Check the graph is a well-formed DAG in topological order.
    ///
    /// Every link must be produced once, before it is read, and read exactly
    /// once; the only unread link is the terminal output of the last statement.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.statements.is_empty() {
            return Err(DomainError::MalformedGraph("graph has no statements".to_string()));
        }

        let mut produced: HashMap<&str, usize> = HashMap::new();
        let mut consumed: HashSet<&str> = HashSet::new();

        for (position, statement) in self.statements.iter().enumerate() {
            let first = statement.filters.first().ok_or_else(|| {
                DomainError::MalformedGraph(format!("statement {} has no filters", position))
            })?;
            let last = statement.filters.last().unwrap_or(first);

            if let Some(expected) = first.expected_inputs() {
                if expected != statement.inputs.len() {
                    return Err(DomainError::MalformedGraph(format!(
                        "statement {} ({}) takes {} inputs, got {}",
                        position,
                        first,
                        expected,
                        statement.inputs.len()
                    )));
                }
            }
            if last.expected_outputs() != statement.outputs.len() {
                return Err(DomainError::MalformedGraph(format!(
                    "statement {} ({}) yields {} outputs, got {}",
                    position,
                    last,
                    last.expected_outputs(),
                    statement.outputs.len()
                )));
            }

            for pad in &statement.inputs {
                let Pad::Link(name) = pad else { continue };
                if !produced.contains_key(name.as_str()) {
                    return Err(DomainError::MalformedGraph(format!(
                        "statement {} reads {} before it is produced",
                        position, pad
                    )));
                }
                if !consumed.insert(name.as_str()) {
                    return Err(DomainError::MalformedGraph(format!(
                        "{} is read more than once",
                        pad
                    )));
                }
            }

            for pad in &statement.outputs {
                let Pad::Link(name) = pad else {
                    return Err(DomainError::MalformedGraph(format!(
                        "statement {} writes to engine input {}",
                        position, pad
                    )));
                };
                if produced.insert(name.as_str(), position).is_some() {
                    return Err(DomainError::MalformedGraph(format!(
                        "{} is produced more than once",
                        pad
                    )));
                }
            }
        }

        let terminal = self.terminal().ok_or_else(|| {
            DomainError::MalformedGraph("last statement must yield exactly one output".to_string())
        })?;

        let mut dangling: Vec<&str> = produced
            .keys()
            .filter(|name| !consumed.contains(*name))
            .copied()
            .collect();
        dangling.sort_unstable();

        match dangling.as_slice() {
            [only] if Pad::link(*only) == *terminal => Ok(()),
            _ => Err(DomainError::MalformedGraph(format!(
                "unread links besides the terminal output: {}",
                dangling
                    .iter()
                    .filter(|name| Pad::link(**name) != *terminal)
                    .map(|name| format!("[{}]", name))
                    .collect::<Vec<_>>()
                    .join("")
            ))),
        }
    }

    /// Render the graph as engine filter text
    pub fn to_filter_complex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}
