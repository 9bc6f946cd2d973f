//! Output naming, rendering and writing.
//!
//! Rendering happens fully in memory; [`write_output`] then writes through a
//! sibling temp file and renames it, so a failed run never leaves a partial
//! output behind.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::Extraction;

pub const TIMESTAMPS_HEADER: &str = "Start Timestamp (seconds)";
pub const DUMP_HEADER: &str = "Hex, Decimal, Binary, and ASCII Representation:";

/// Where the output file is placed relative to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Beside the input file.
    PreserveDirectory,
    /// In the current working directory.
    #[default]
    StripDirectory,
}

/// What gets written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// One timestamp per line, six fractional digits.
    #[default]
    Timestamps,
    /// The serialized [`Extraction`] report.
    Json,
    /// Byte-by-byte listing of the region.
    Dump,
}

impl OutputKind {
    pub fn suffix(self) -> &'static str {
        match self {
            OutputKind::Timestamps => "-extract.txt",
            OutputKind::Json => "-extract.json",
            OutputKind::Dump => "-dump.txt",
        }
    }
}

/// Derive the output path from the input's file stem.
///
/// Returns `None` when the input has no file name (e.g. `..`).
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
///
/// use midico_core::{OutputKind, OutputLayout, output_path};
///
/// let input = Path::new("songs/track.mdc");
/// assert_eq!(
///     output_path(input, OutputLayout::StripDirectory, OutputKind::Timestamps),
///     Some(PathBuf::from("track-extract.txt"))
/// );
/// assert_eq!(
///     output_path(input, OutputLayout::PreserveDirectory, OutputKind::Timestamps),
///     Some(PathBuf::from("songs/track-extract.txt"))
/// );
/// ```
pub fn output_path(input: &Path, layout: OutputLayout, kind: OutputKind) -> Option<PathBuf> {
    let mut name = OsString::from(input.file_stem()?);
    name.push(kind.suffix());
    match layout {
        OutputLayout::PreserveDirectory => Some(input.with_file_name(name)),
        OutputLayout::StripDirectory => Some(PathBuf::from(name)),
    }
}

pub fn render_timestamps(timestamps: &[f64]) -> String {
    let mut out = String::with_capacity(TIMESTAMPS_HEADER.len() + 1 + timestamps.len() * 12);
    out.push_str(TIMESTAMPS_HEADER);
    out.push('\n');
    for ts in timestamps {
        let _ = writeln!(out, "{ts:.6}");
    }
    out
}

pub fn render_dump(bytes: &[u8]) -> String {
    let mut out = String::from(DUMP_HEADER);
    out.push('\n');
    for &byte in bytes {
        let ascii = if (32..127).contains(&byte) {
            byte as char
        } else {
            '.'
        };
        let _ = writeln!(out, "{byte:02x} {byte:3} {byte:08b} {ascii}");
    }
    out
}

pub fn render_json(extraction: &Extraction) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(extraction)?;
    json.push('\n');
    Ok(json)
}

/// Write `contents` to `path`, replacing any existing file only on success.
pub fn write_output(path: &Path, contents: &str) -> io::Result<()> {
    let mut tmp_name = OsString::from(".");
    tmp_name.push(path.file_name().unwrap_or(path.as_os_str()));
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    replace_via(&tmp, path, |tmp| fs::write(tmp, contents))
}

fn replace_via<F>(tmp: &Path, path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let result = write(tmp).and_then(|()| fs::rename(tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(tmp);
    }
    result
}
