// src/error.rs
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PtuError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput { offset: usize, needed: usize, available: usize },

    #[error("Unsupported tag type 0x{code:08X} (value would start at offset {offset})")]
    UnsupportedTagType { code: u32, offset: usize },

    #[error("Unsupported board count: {0}")]
    UnsupportedBoardCount(i32),

    #[error("Unsupported record layout: {0}")]
    UnsupportedRecordLayout(String),

    #[error("Bad creation timestamp: {0:?}")]
    BadTimestamp(String),

    #[error("Invalid tag: expected {expected}, found {found}")]
    InvalidTag { expected: String, found: String },

    #[error("Tag identifier longer than 32 bytes: {0}")]
    IdentifierTooLong(String),

    #[error("Invalid template snapshot: {0}")]
    Snapshot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PtuError>;
