//! vloop - Video Looper Library
//!
//! Plans and renders looped videos. The domain layer computes repeat counts and
//! builds cross-fade filter graphs; adapters run `ffprobe` and `ffmpeg`.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::graph::{FilterGraph, TransitionGraphBuilder};
pub use domain::model::{LoopPlan, LoopRequest, TransitionSpec};
pub use domain::rules::LoopPlanner;
pub use error::{VloopError, VloopResult};
