//! Midico timing-data decoding.
//!
//! A Midico file carries its timing records between a start marker (`L1`)
//! and an end marker (`L2`). The parser finds the first occurrence of each
//! marker, then walks the enclosed bytes in 11-byte records: 4 opaque header
//! bytes, a big-endian 16-bit fixed-point timestamp, 5 opaque trailer bytes.
//! A trailing group shorter than one record is dropped.
//!
//! Byte offsets and bit-field constants live in `layout`, bounds-checked
//! access in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::{Marker, MidicoError};
pub use parser::{Record, Records, Region, decode_timestamp, locate_region, records};
