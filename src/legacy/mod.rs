// src/legacy/mod.rs
//! Reader for the fixed-layout PicoHarp 300 `.pt2`/`.pt3` header.
//!
//! The layout is positional: a text block, 18 measurement integers, display
//! settings, one record per board (each with four router channels), the
//! TTTR block, and `Imghdrsize` special-header words. Everything after that
//! is event records.

mod header;
mod reader;

pub use header::{
    AcquisitionMode, BoardRecord, DisplayCurve, DisplayParam, DisplaySettings, LegacyHeader,
    LegacyValue, MeasurementSettings, RouterChannel, TextHeader, TttrSettings, BOARD_RECORD_LEN,
    DISPLAY_BLOCK_LEN, MAX_BOARDS, MEASUREMENT_BLOCK_LEN, ROUTER_CHANNELS, TEXT_BLOCK_LEN,
    TTTR_BLOCK_LEN,
};
pub use reader::{parse_file_time, read_legacy_header, FILE_TIME_FORMAT};
