use std::path::Path;

use thiserror::Error;

use crate::format::midico::{MidicoError, locate_region, records};
use crate::observer::DecodeObserver;
use crate::source::{SourceError, read_input};
use crate::{Extraction, RegionSummary, make_extraction};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Format error: {0}")]
    Format(#[from] MidicoError),
}

/// Read a Midico file and decode every complete timestamp record.
pub fn extract_file<O>(path: &Path, observer: &mut O) -> Result<Extraction, ExtractError>
where
    O: DecodeObserver + ?Sized,
{
    let data = read_input(path)?;
    let extraction = extract_bytes(&path.display().to_string(), &data, observer)?;
    Ok(extraction)
}

/// Decode an in-memory Midico buffer; `input_path` is only recorded in the
/// result.
pub fn extract_bytes<O>(
    input_path: &str,
    data: &[u8],
    observer: &mut O,
) -> Result<Extraction, MidicoError>
where
    O: DecodeObserver + ?Sized,
{
    observer.input_loaded(data.len());
    let region = locate_region(data)?;
    observer.region_located(&region);

    let mut iter = records(&region);
    let mut timestamps = Vec::with_capacity(iter.len());
    for record in iter.by_ref() {
        observer.record_decoded(&record);
        timestamps.push(record.seconds);
    }
    let discarded = iter.remainder();
    if discarded > 0 {
        observer.tail_discarded(discarded);
    }

    let mut extraction = make_extraction(input_path, data.len() as u64);
    extraction.region = Some(RegionSummary {
        start_marker: region.start_marker() as u64,
        end_marker: region.end_marker() as u64,
        offset: region.offset() as u64,
        bytes: region.len() as u64,
        clamped: region.clamped(),
    });
    extraction.records = timestamps.len() as u64;
    extraction.discarded_tail_bytes = discarded as u64;
    extraction.timestamps = timestamps;
    Ok(extraction)
}
