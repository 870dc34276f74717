// Domain layer - Loop planning and filter graph construction

pub mod errors;
pub mod graph;
pub mod model;
pub mod rules;
