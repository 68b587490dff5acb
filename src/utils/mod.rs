// src/utils/mod.rs
mod string_encoding;
mod cursor;
mod source;

pub(crate) use string_encoding::*;
pub use cursor::ByteCursor;
pub use source::InputBuffer;
