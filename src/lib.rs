// src/lib.rs
//! # pqtttr
//!
//! Conversion of legacy PicoHarp 300 TTTR files (`.pt2`, `.pt3`) into the
//! PicoQuant unified tagged format (`.ptu`).
//!
//! ## Features
//!
//! - **Legacy header reader**: decodes the fixed-offset `.pt2`/`.pt3` header, boards and router channels included
//! - **Tag-stream codec**: reads and writes `.ptu` headers tag by tag, with typed values
//! - **Templates**: re-emit a known-good header, substituting acquisition time, record count, timestamp and rates
//! - **Verbatim payload**: event records are copied byte for byte, never decoded
//!
//! ## Quick Start
//!
//! ### Converting a file
//!
//! ```rust,no_run
//! use pqtttr::*;
//!
//! fn main() -> Result<()> {
//!     let output = convert_file("run_000.pt2", "picoharp_template.json")?;
//!     println!("Wrote {}", output.display());
//!     Ok(())
//! }
//! ```
//!
//! ### Inspecting a `.ptu` header
//!
//! ```rust,no_run
//! use pqtttr::*;
//!
//! fn main() -> Result<()> {
//!     let file = PtuFile::open("run_000.ptu")?;
//!     print!("{}", file.tags());
//!     println!("{} bytes of event records", file.records().len());
//!     Ok(())
//! }
//! ```
//!
//! ### Capturing a template
//!
//! ```rust,no_run
//! use pqtttr::*;
//!
//! fn main() -> Result<()> {
//!     let file = PtuFile::open("known_good.ptu")?;
//!     save_template(file.tags(), "picoharp_template.json")?;
//!     Ok(())
//! }
//! ```

// Modules
pub mod error;
pub mod types;
pub mod tags;
pub mod legacy;
pub mod template;
pub mod combine;
pub mod config;
pub mod convert;

mod utils;

pub use error::{PtuError, Result};

pub use types::{
    OleDate,
    RecordType,
    TagRecord,
    TagSequence,
    TagType,
    TagValue,
    HEADER_END,
};

pub use tags::{
    encode_tag_stream,
    parse_tag_stream,
    read_tag_stream,
    write_tag_stream,
    HeaderOverrides,
    PtuFile,
    TagStream,
};

pub use legacy::{read_legacy_header, AcquisitionMode, LegacyHeader, LegacyValue};

pub use template::{load_template, save_template, TemplateSnapshot};

pub use combine::{combine, split_at_header, write_combined};

pub use config::ConvertOptions;

pub use convert::{convert_file, ConversionReport, Converter};

pub use utils::{ByteCursor, InputBuffer};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use pqtttr::prelude::*;
    //! ```

    pub use crate::error::{PtuError, Result};
    pub use crate::types::{TagRecord, TagSequence, TagValue};
    pub use crate::tags::{encode_tag_stream, read_tag_stream, HeaderOverrides};
    pub use crate::legacy::read_legacy_header;
    pub use crate::convert::{convert_file, Converter};
}

/// Magic written at the start of every tagged file
pub const PTU_MAGIC: &str = tags::MAGIC;

/// Tag-stream version this library writes
pub const PTU_VERSION: &str = tags::VERSION;

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
