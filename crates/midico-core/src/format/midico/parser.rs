use std::iter::FusedIterator;

use super::error::{Marker, MidicoError};
use super::layout;
use super::reader::MidicoReader;

/// Bytes strictly between the first start marker and the first end marker.
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    bytes: &'a [u8],
    start_marker: usize,
    end_marker: usize,
    clamped: bool,
}

impl<'a> Region<'a> {
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Index of the first start marker in the input buffer.
    pub fn start_marker(&self) -> usize {
        self.start_marker
    }

    /// Index of the first end marker in the input buffer.
    pub fn end_marker(&self) -> usize {
        self.end_marker
    }

    /// Offset of the first region byte in the input buffer.
    pub fn offset(&self) -> usize {
        self.start_marker + layout::MARKER_LEN
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the end marker precedes the end of the start marker and the
    /// region was forced to zero length.
    pub fn clamped(&self) -> bool {
        self.clamped
    }
}

/// A single decoded 11-byte record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    /// Offset of the record's first header byte within the region.
    pub offset: usize,
    /// All bytes of the record, header and trailer included (undecoded).
    pub bytes: &'a [u8],
    /// Raw big-endian timestamp field.
    pub raw: u16,
    /// Decoded timestamp in seconds.
    pub seconds: f64,
}

/// Locate the region delimited by the first start and first end marker.
///
/// Both markers are searched independently over the whole buffer. If the end
/// marker lies before the end of the start marker the region is empty and
/// [`Region::clamped`] is set.
///
/// # Examples
/// ```
/// use midico_core::locate_region;
///
/// let data = [0x4C, 0x31, 0xAA, 0xBB, 0x4C, 0x32];
/// let region = locate_region(&data)?;
/// assert_eq!(region.bytes(), &[0xAA, 0xBB]);
/// # Ok::<(), midico_core::MidicoError>(())
/// ```
pub fn locate_region(data: &[u8]) -> Result<Region<'_>, MidicoError> {
    let reader = MidicoReader::new(data);
    let start_marker = reader
        .find_marker(layout::START_MARKER)
        .ok_or(MidicoError::MarkerNotFound {
            marker: Marker::Start,
        })?;
    let end_marker = reader
        .find_marker(layout::END_MARKER)
        .ok_or(MidicoError::MarkerNotFound {
            marker: Marker::End,
        })?;

    let begin = start_marker + layout::MARKER_LEN;
    let clamped = end_marker < begin;
    let bytes = if clamped {
        reader.read_slice(begin..begin)?
    } else {
        reader.read_slice(begin..end_marker)?
    };

    Ok(Region {
        bytes,
        start_marker,
        end_marker,
        clamped,
    })
}

/// Decode a raw timestamp field into seconds.
///
/// The top 5 bits hold whole seconds biased by 16, the low 11 bits a fraction
/// over 2048. Fields below the bias decode to negative seconds.
///
/// # Examples
/// ```
/// use midico_core::decode_timestamp;
///
/// assert_eq!(decode_timestamp(0x8000), 0.0);
/// assert_eq!(decode_timestamp(0x8800), 1.0);
/// assert_eq!(decode_timestamp(0x0400), -15.5);
/// ```
pub fn decode_timestamp(raw: u16) -> f64 {
    let whole = i32::from(raw >> layout::WHOLE_SECONDS_SHIFT) - layout::WHOLE_SECONDS_BIAS;
    let fraction = f64::from(raw & layout::FRACTION_MASK) / layout::FRACTION_SCALE;
    f64::from(whole) + fraction
}

/// Iterate over the complete records of a region.
pub fn records<'a>(region: &Region<'a>) -> Records<'a> {
    Records::new(region.bytes())
}

/// Forward-only record iterator. A trailing group shorter than a record ends
/// iteration and is reported by [`Records::remainder`].
#[derive(Debug)]
pub struct Records<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> Records<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    /// Bytes not yet consumed; once iteration ends this is the discarded tail.
    pub fn remainder(&self) -> usize {
        self.data.len() - self.cursor
    }

    fn read_record(&self, offset: usize) -> Result<Record<'a>, MidicoError> {
        let region = MidicoReader::new(self.data);
        let bytes = region.read_slice(offset..offset + layout::RECORD_LEN)?;
        let record = MidicoReader::new(bytes);
        let raw = record.read_u16_be(layout::TIMESTAMP_RANGE)?;
        Ok(Record {
            offset,
            bytes,
            raw,
            seconds: decode_timestamp(raw),
        })
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        if self.remainder() < layout::RECORD_LEN {
            return None;
        }
        let record = self.read_record(self.cursor).ok()?;
        self.cursor += layout::RECORD_LEN;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remainder() / layout::RECORD_LEN;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Records<'_> {}

impl FusedIterator for Records<'_> {}

#[cfg(test)]
mod tests {
    use super::{decode_timestamp, locate_region, records};
    use crate::format::midico::error::{Marker, MidicoError};
    use crate::format::midico::layout;

    fn record(raw: u16) -> Vec<u8> {
        let mut bytes = vec![0u8; layout::RECORD_LEN];
        bytes[layout::TIMESTAMP_RANGE].copy_from_slice(&raw.to_be_bytes());
        bytes
    }

    fn framed(body: &[u8]) -> Vec<u8> {
        let mut data = layout::START_MARKER.to_vec();
        data.extend_from_slice(body);
        data.extend_from_slice(layout::END_MARKER);
        data
    }

    #[test]
    fn decode_zero_and_one_second() {
        assert_eq!(decode_timestamp(0x8000), 0.0);
        assert_eq!(decode_timestamp(0x8800), 1.0);
    }

    #[test]
    fn decode_fraction_bits() {
        assert_eq!(decode_timestamp(0x8400), 0.5);
        assert_eq!(decode_timestamp(0x8001), 1.0 / 2048.0);
        assert_eq!(decode_timestamp(0xFFFF), 15.0 + 2047.0 / 2048.0);
    }

    #[test]
    fn decode_keeps_negative_whole_seconds() {
        assert_eq!(decode_timestamp(0x0000), -16.0);
        assert_eq!(decode_timestamp(0x7800), -1.0);
        assert_eq!(decode_timestamp(0x7C00), -0.5);
    }

    #[test]
    fn decode_matches_formula_for_all_values() {
        for raw in 0..=u16::MAX {
            let expected =
                ((raw >> 11) as i32 - 16) as f64 + (raw & 0x7FF) as f64 / 2048.0;
            assert_eq!(decode_timestamp(raw), expected, "raw {raw:#06x}");
        }
    }

    #[test]
    fn locate_missing_start() {
        let err = locate_region(&[0x00, 0x4C, 0x32]).unwrap_err();
        assert!(matches!(
            err,
            MidicoError::MarkerNotFound {
                marker: Marker::Start
            }
        ));
    }

    #[test]
    fn locate_missing_end() {
        let err = locate_region(&[0x4C, 0x31, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            MidicoError::MarkerNotFound {
                marker: Marker::End
            }
        ));
    }

    #[test]
    fn locate_empty_buffer() {
        assert!(locate_region(&[]).is_err());
    }

    #[test]
    fn locate_uses_first_markers() {
        let data = [0xFF, 0x4C, 0x31, 0x01, 0x02, 0x4C, 0x32, 0x4C, 0x31, 0x4C, 0x32];
        let region = locate_region(&data).unwrap();
        assert_eq!(region.start_marker(), 1);
        assert_eq!(region.end_marker(), 5);
        assert_eq!(region.offset(), 3);
        assert_eq!(region.bytes(), &[0x01, 0x02]);
        assert!(!region.clamped());
    }

    #[test]
    fn locate_adjacent_markers_is_empty() {
        let region = locate_region(&[0x4C, 0x31, 0x4C, 0x32]).unwrap();
        assert!(region.is_empty());
        assert!(!region.clamped());
    }

    #[test]
    fn locate_end_before_start_clamps() {
        let data = [0x4C, 0x32, 0x00, 0x00, 0x4C, 0x31, 0x00];
        let region = locate_region(&data).unwrap();
        assert_eq!(region.start_marker(), 4);
        assert_eq!(region.end_marker(), 0);
        assert!(region.is_empty());
        assert!(region.clamped());
        assert_eq!(records(&region).count(), 0);
    }

    #[test]
    fn ten_byte_region_has_no_records() {
        let data = [
            0x4C, 0x31, 0x00, 0x00, 0x00, 0x00, 0x88, 0x00, 0x00, 0x00, 0x00, 0x00, 0x4C, 0x32,
        ];
        let region = locate_region(&data).unwrap();
        assert_eq!(region.len(), 10);
        let mut iter = records(&region);
        assert!(iter.next().is_none());
        assert_eq!(iter.remainder(), 10);
    }

    #[test]
    fn eleven_byte_region_has_one_record() {
        let data = framed(&record(0x8800));
        let region = locate_region(&data).unwrap();
        let decoded: Vec<_> = records(&region).collect();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].offset, 0);
        assert_eq!(decoded[0].raw, 0x8800);
        assert_eq!(decoded[0].seconds, 1.0);
    }

    #[test]
    fn partial_tail_is_discarded() {
        for tail in 0..layout::RECORD_LEN {
            let mut body = Vec::new();
            for raw in [0x8000u16, 0x8800, 0x9000] {
                body.extend(record(raw));
            }
            body.extend(std::iter::repeat_n(0xEEu8, tail));
            let data = framed(&body);
            let region = locate_region(&data).unwrap();

            let mut iter = records(&region);
            assert_eq!(iter.len(), 3);
            let seconds: Vec<f64> = iter.by_ref().map(|r| r.seconds).collect();
            assert_eq!(seconds, vec![0.0, 1.0, 2.0]);
            assert_eq!(iter.remainder(), tail);
            assert!(iter.next().is_none());
        }
    }

    #[test]
    fn header_and_trailer_bytes_are_ignored() {
        let mut body = vec![0xFFu8; layout::RECORD_LEN];
        body[layout::TIMESTAMP_RANGE].copy_from_slice(&0x8400u16.to_be_bytes());
        let data = framed(&body);
        let region = locate_region(&data).unwrap();
        let decoded: Vec<_> = records(&region).map(|r| r.seconds).collect();
        assert_eq!(decoded, vec![0.5]);
    }

    #[test]
    fn decoding_twice_is_identical() {
        let mut body = record(0x8123);
        body.extend(record(0x7FFF));
        let data = framed(&body);
        let region = locate_region(&data).unwrap();
        let first: Vec<_> = records(&region).collect();
        let second: Vec<_> = records(&region).collect();
        assert_eq!(first, second);
    }
}
