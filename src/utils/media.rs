//! Video file detection and input expansion

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Bytes read from the start of a file when sniffing its container
const SNIFF_LEN: usize = 512;

/// MPEG transport stream packet size
const TS_PACKET_LEN: usize = 188;

/// Extensions accepted when the header is not recognised
const VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "avi", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "mts", "ogv", "ts",
    "webm", "wmv",
];

/// ISO-BMFF brands that mark audio-only files
const AUDIO_BRANDS: &[&[u8; 4]] = &[b"M4A ", b"M4B ", b"M4P "];

/// Container families recognised from their leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// MP4, MOV, 3GP and friends
    IsoBmff,
    /// MKV and WebM
    Matroska,
    Avi,
    Flv,
    MpegTs,
    MpegPs,
    Asf,
}

/// Identify a video container from the start of a file
pub fn sniff_container(header: &[u8]) -> Option<Container> {
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        let brand = &header[8..12];
        if AUDIO_BRANDS.iter().any(|audio| &audio[..] == brand) {
            return None;
        }
        return Some(Container::IsoBmff);
    }
    if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some(Container::Matroska);
    }
    if header.len() >= 12 && header.starts_with(b"RIFF") && &header[8..12] == b"AVI " {
        return Some(Container::Avi);
    }
    if header.starts_with(b"FLV") {
        return Some(Container::Flv);
    }
    if header.starts_with(&[0x00, 0x00, 0x01, 0xBA]) {
        return Some(Container::MpegPs);
    }
    if header.starts_with(&[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11]) {
        return Some(Container::Asf);
    }
    if header.len() > TS_PACKET_LEN && header[0] == 0x47 && header[TS_PACKET_LEN] == 0x47 {
        return Some(Container::MpegTs);
    }
    None
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether `path` is a non-empty file that looks like a video.
///
/// The header decides when it is recognised; otherwise the extension does.
pub fn is_video_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut header = Vec::with_capacity(SNIFF_LEN);
    if file.take(SNIFF_LEN as u64).read_to_end(&mut header).is_err() || header.is_empty() {
        return false;
    }

    match sniff_container(&header) {
        Some(container) => {
            debug!(file = %path.display(), ?container, "Recognised container");
            true
        }
        None => has_video_extension(path),
    }
}

/// Expand directories into the video files directly inside them.
///
/// Files are passed through untouched so they can be reported individually.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::with_capacity(inputs.len());

    for input in inputs {
        if !input.is_dir() {
            expanded.push(input.clone());
            continue;
        }

        let before = expanded.len();
        expanded.extend(
            WalkDir::new(input)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| is_video_file(path)),
        );
        debug!(
            directory = %input.display(),
            found = expanded.len() - before,
            "Expanded input directory"
        );
    }

    expanded
}
