// Ports - Interface definitions (contracts)

use std::path::Path;

use crate::domain::graph::FilterGraph;
use crate::error::VloopResult;

/// Port for media file probing
pub trait ProbePort {
    /// Duration of the clip in whole seconds; the fractional part is dropped
    fn clip_duration(&self, file_path: &Path) -> VloopResult<u32>;
}

/// Port for the external transcoding engine
pub trait EnginePort {
    /// Re-encode the files listed in a concat demuxer list into `output`, video only
    fn run_concat(&self, list_file: &Path, output: &Path) -> VloopResult<()>;

    /// Run `graph` over `input` and write its terminal stream to `output`, video only
    fn run_filter_graph(&self, input: &Path, graph: &FilterGraph, output: &Path) -> VloopResult<()>;
}
