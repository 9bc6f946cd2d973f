use super::error::MidicoError;
use super::layout;

pub struct MidicoReader<'a> {
    data: &'a [u8],
}

impl<'a> MidicoReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn find_marker(&self, marker: &[u8; layout::MARKER_LEN]) -> Option<usize> {
        self.data
            .windows(layout::MARKER_LEN)
            .position(|window| window == marker)
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, MidicoError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(MidicoError::TooShort {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], MidicoError> {
        self.data.get(range.clone()).ok_or(MidicoError::TooShort {
            needed: range.end,
            actual: self.data.len(),
        })
    }
}
