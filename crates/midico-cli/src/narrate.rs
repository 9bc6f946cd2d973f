use midico_core::{DecodeObserver, RECORD_LEN, Record, Region};
use tracing::{debug, info, trace, warn};

/// Narrates a decode through `tracing`: region bounds at info, each record at
/// debug, raw header/trailer bits at trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

fn bits(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:08b}")).collect()
}

impl DecodeObserver for TracingObserver {
    fn input_loaded(&mut self, bytes: usize) {
        info!(bytes, "input loaded");
    }

    fn region_located(&mut self, region: &Region<'_>) {
        if region.clamped() {
            warn!(
                start_marker = region.start_marker(),
                end_marker = region.end_marker(),
                "end marker precedes start marker; region is empty"
            );
            return;
        }
        info!(
            start_marker = region.start_marker(),
            end_marker = region.end_marker(),
            bytes = region.len(),
            records = region.len() / RECORD_LEN,
            "region located"
        );
    }

    fn record_decoded(&mut self, record: &Record<'_>) {
        let raw_bits = format!("{:016b}", record.raw);
        debug!(
            offset = record.offset,
            bits = %raw_bits,
            whole = %&raw_bits[..5],
            fraction = %&raw_bits[5..],
            seconds = record.seconds,
            "record decoded"
        );
        trace!(offset = record.offset, bytes = %bits(record.bytes), "record bytes");
    }

    fn tail_discarded(&mut self, len: usize) {
        debug!(bytes = len, "partial record discarded");
    }
}
