use std::fmt;

use thiserror::Error;

use super::layout;

/// One of the two delimiters surrounding the record region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Start,
    End,
}

impl Marker {
    pub fn bytes(self) -> &'static [u8; layout::MARKER_LEN] {
        match self {
            Marker::Start => layout::START_MARKER,
            Marker::End => layout::END_MARKER,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = *self.bytes();
        let name = match self {
            Marker::Start => "start",
            Marker::End => "end",
        };
        write!(f, "{name} marker {a:02X} {b:02X}")
    }
}

/// Errors returned by Midico region location and record reading.
///
/// # Examples
/// ```
/// use midico_core::{Marker, MidicoError};
///
/// let err = MidicoError::MarkerNotFound { marker: Marker::End };
/// assert!(err.to_string().contains("end marker 4C 32"));
/// ```
#[derive(Debug, Error)]
pub enum MidicoError {
    #[error("{marker} not found in input")]
    MarkerNotFound { marker: Marker },
    #[error("region too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}
