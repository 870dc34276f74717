// Application layer - Use case interactors

pub mod loop_interactor;

// Re-export interactors
pub use loop_interactor::{BatchReport, ClipOutcome, LoopInteractor, LoopSettings};
