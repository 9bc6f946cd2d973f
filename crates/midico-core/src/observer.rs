//! Hooks for narrating a decode without entangling it with parsing.
//!
//! Parsers never log. Callers that want progress or bit-level diagnostics
//! pass a [`DecodeObserver`] to [`crate::extract_bytes`]; every method has a
//! no-op default.

use crate::format::midico::{Record, Region};

pub trait DecodeObserver {
    /// Called once with the input size before the marker search.
    fn input_loaded(&mut self, _bytes: usize) {}

    /// Called once the marker pair has been found.
    fn region_located(&mut self, _region: &Region<'_>) {}

    /// Called for each complete record, in order.
    fn record_decoded(&mut self, _record: &Record<'_>) {}

    /// Called when iteration stops with a partial record left over.
    fn tail_discarded(&mut self, _len: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DecodeObserver for NoopObserver {}
