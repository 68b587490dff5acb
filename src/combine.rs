// src/combine.rs
use crate::error::Result;
use std::io::Write;

/// Header followed by payload, both unchanged.
pub fn combine(header: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.len() + payload.len());
    out.extend_from_slice(header);
    out.extend_from_slice(payload);
    out
}

pub fn write_combined<W: Write>(writer: &mut W, header: &[u8], payload: &[u8]) -> Result<()> {
    writer.write_all(header)?;
    writer.write_all(payload)?;
    Ok(())
}

/// Inverse of [`combine`] for a known header length.
pub fn split_at_header(bytes: &[u8], header_len: usize) -> Option<(&[u8], &[u8])> {
    (header_len <= bytes.len()).then(|| bytes.split_at(header_len))
}
