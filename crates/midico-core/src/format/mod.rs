//! Binary format decoding modules.
//!
//! Each format follows a layered structure:
//! - `layout`: markers, strides and bit-field constants (source of truth)
//! - `reader`: safe byte access and byte-order conventions
//! - `parser`: region location and record decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O or logging; `source`, `extract` and
//! `output` handle file access, observation and rendering.

pub mod midico;
