// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided (bad flag combination, count below the minimum)
    BadArgs(String),
    /// Target duration is zero or otherwise unreachable
    InvalidTarget(String),
    /// Clip is not longer than the transition, so it cannot be looped with it
    DegenerateClip {
        clip_seconds: f64,
        transition_seconds: u32,
    },
    /// Filter graph failed its well-formedness check
    MalformedGraph(String),
}

impl DomainError {
    /// Whether the error invalidates the whole invocation rather than a single clip
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::BadArgs(_))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::InvalidTarget(msg) => write!(f, "Invalid target duration: {}", msg),
            DomainError::DegenerateClip {
                clip_seconds,
                transition_seconds,
            } => write!(
                f,
                "Clip length ({}s) must be greater than the transition duration ({}s)",
                clip_seconds, transition_seconds
            ),
            DomainError::MalformedGraph(msg) => write!(f, "Malformed filter graph: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
