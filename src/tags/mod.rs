// src/tags/mod.rs
//! Tag-stream codec for the PicoQuant unified TTTR (`.ptu`) header.
//!
//! A tag stream is an 8-byte magic, an 8-byte version, then a sequence of
//! records of the form
//!
//! ```text
//! ident: [u8; 32]   nul padded
//! index: i32        -1 when not indexed
//! type:  u32        TagType code
//! value: 8 bytes    scalar, or a length followed by that many payload bytes
//! ```
//!
//! terminated by a record named `Header_End`.
//!
//! # Example
//!
//! ```
//! use pqtttr::tags::{encode_tag_stream, read_tag_stream, HeaderOverrides};
//! use pqtttr::types::{TagRecord, TagSequence, TagValue, HEADER_END};
//!
//! let template: TagSequence = vec![
//!     TagRecord::new("TTResult_NumberOfRecords", -1, TagValue::Int64(0)),
//!     TagRecord::new(HEADER_END, -1, TagValue::Empty),
//! ].into();
//!
//! let overrides = HeaderOverrides::new().number_of_records(1234);
//! let bytes = encode_tag_stream(&template, &overrides).unwrap();
//!
//! let tags = read_tag_stream(&bytes).unwrap();
//! assert_eq!(tags.find("TTResult_NumberOfRecords").unwrap().value, TagValue::Int64(1234));
//! ```

mod overrides;
mod reader;
mod writer;

pub use overrides::{HeaderOverrides, OverrideSlot, OVERRIDE_TARGETS};
pub use reader::{parse_tag_stream, read_tag_stream, PtuFile, TagStream};
pub use writer::{encode_tag_stream, write_tag_stream};

pub const MAGIC: &str = "PQTTTR";
pub const VERSION: &str = "1.0.00";
pub const IDENT_WIDTH: usize = 32;
/// Largest stored length accepted for an AnsiString or WideString value.
pub const MAX_STRING_LEN: u64 = 1 << 24;
/// Magic plus version.
pub const PREAMBLE_LEN: usize = 16;
/// Identifier, index and type code of every record.
pub const RECORD_PREFIX_LEN: usize = IDENT_WIDTH + 8;
