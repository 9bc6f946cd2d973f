//! Midico core library for timing-data extraction.
//!
//! A Midico file stores its timing records between two 2-byte markers. This
//! crate reads the file (`source`), locates the marker pair and decodes the
//! fixed-point timestamp of every complete 11-byte record (`format`), and
//! renders the result as text, JSON or a byte listing (`output`).
//! Parsing is byte-oriented and side-effect free; narration of a decode is
//! opt-in through a [`DecodeObserver`].
//!
//! Invariants:
//! - Only the first start marker and the first end marker are used.
//! - An end marker found before the start marker yields an empty region.
//! - A trailing group shorter than one record is dropped, never an error.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use midico_core::{NoopObserver, extract_file, render_timestamps};
//!
//! let extraction = extract_file(Path::new("take.mdc"), &mut NoopObserver)?;
//! print!("{}", render_timestamps(&extraction.timestamps));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod extract;
mod format;
mod observer;
mod output;
mod source;

pub use extract::{ExtractError, extract_bytes, extract_file};
pub use format::midico::layout::{END_MARKER, RECORD_LEN, START_MARKER};
pub use format::midico::{
    Marker, MidicoError, Record, Records, Region, decode_timestamp, locate_region, records,
};
pub use observer::{DecodeObserver, NoopObserver};
pub use output::{
    DUMP_HEADER, OutputKind, OutputLayout, TIMESTAMPS_HEADER, output_path, render_dump,
    render_json, render_timestamps, write_output,
};
pub use source::{SourceError, read_input};

/// Current extraction report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Result of decoding one Midico file.
///
/// # Examples
/// ```
/// use midico_core::make_extraction;
///
/// let extraction = make_extraction("take.mdc", 42);
/// assert_eq!(extraction.report_version, midico_core::REPORT_VERSION);
/// assert!(extraction.timestamps.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input file metadata.
    pub input: InputInfo,
    /// Marker positions and region size, once located.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionSummary>,
    /// Number of complete records decoded.
    pub records: u64,
    /// Bytes after the last complete record that were dropped.
    pub discarded_tail_bytes: u64,
    /// Decoded timestamps in seconds, in file order.
    pub timestamps: Vec<f64>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the extractor.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Location of the record region inside the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Index of the first start marker.
    pub start_marker: u64,
    /// Index of the first end marker.
    pub end_marker: u64,
    /// Index of the first region byte.
    pub offset: u64,
    /// Region length in bytes.
    pub bytes: u64,
    /// Set when the end marker preceded the start marker.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clamped: bool,
}

/// Build an extraction with input metadata filled and no records.
pub fn make_extraction(input_path: &str, input_bytes: u64) -> Extraction {
    Extraction {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "mdcextract".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        region: None,
        records: 0,
        discarded_tail_bytes: 0,
        timestamps: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_region_when_none() {
        let extraction = make_extraction("take.mdc", 1);
        let value = serde_json::to_value(&extraction).expect("extraction json");
        assert!(value.get("region").is_none());
        assert_eq!(value["tool"]["name"], "mdcextract");
        assert_eq!(value["timestamps"], serde_json::json!([]));
    }

    #[test]
    fn report_omits_clamped_when_false() {
        let mut extraction = make_extraction("take.mdc", 4);
        extraction.region = Some(RegionSummary {
            start_marker: 0,
            end_marker: 2,
            offset: 2,
            bytes: 0,
            clamped: false,
        });
        let value = serde_json::to_value(&extraction).expect("extraction json");
        assert!(value["region"].get("clamped").is_none());

        extraction.region.as_mut().unwrap().clamped = true;
        let value = serde_json::to_value(&extraction).expect("extraction json");
        assert_eq!(value["region"]["clamped"], true);
    }
}
