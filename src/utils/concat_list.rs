//! Concat demuxer list files
//!
//! The list lives next to the source clip and is deleted when the
//! [`ConcatList`] is dropped, whichever way the loop attempt ends.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{VloopError, VloopResult};
use crate::utils::path::input_stem;

/// Temporary list naming the same clip `count` times
#[derive(Debug)]
pub struct ConcatList {
    file: NamedTempFile,
}

impl ConcatList {
    /// Write the list for `clip` into the clip's own directory
    pub fn create(clip: &Path, count: u32) -> VloopResult<Self> {
        let absolute = std::fs::canonicalize(clip)?;
        let directory = match clip.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let stem = input_stem(clip)?;
        let body = Self::render(&absolute, count)?;

        let mut file = tempfile::Builder::new()
            .prefix(&stem)
            .suffix(".txt")
            .tempfile_in(directory)?;
        file.write_all(body.as_bytes())?;
        file.flush()?;

        debug!(list = %file.path().display(), count, "Wrote concat list");
        Ok(Self { file })
    }

    /// List body: one `file '<path>'` line per repeat.
    ///
    /// The list is text, so the path must be valid UTF-8.
    pub fn render(clip: &Path, count: u32) -> VloopResult<String> {
        let text = clip.to_str().ok_or_else(|| VloopError::NonUtf8Path {
            path: clip.to_path_buf(),
        })?;
        let line = format!("file '{}'\n", text.replace('\'', r"'\''"));
        Ok(line.repeat(count as usize))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
