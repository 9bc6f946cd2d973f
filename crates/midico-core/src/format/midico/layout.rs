pub const START_MARKER: &[u8; 2] = b"L1";
pub const END_MARKER: &[u8; 2] = b"L2";
pub const MARKER_LEN: usize = 2;

pub const HEADER_LEN: usize = 4;
pub const TIMESTAMP_RANGE: std::ops::Range<usize> = HEADER_LEN..HEADER_LEN + 2;
pub const TRAILER_LEN: usize = 5;
pub const RECORD_LEN: usize = TIMESTAMP_RANGE.end + TRAILER_LEN;

// 5-bit biased whole seconds, 11-bit fraction over 2048.
pub const WHOLE_SECONDS_SHIFT: u32 = 11;
pub const WHOLE_SECONDS_BIAS: i32 = 16;
pub const FRACTION_MASK: u16 = 0x07FF;
pub const FRACTION_SCALE: f64 = 2048.0;
