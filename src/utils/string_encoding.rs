// src/utils/string_encoding.rs
use std::borrow::Cow;
use tracing::warn;

/// Decode a nul-padded byte field as UTF-8, replacing invalid sequences.
///
/// Invalid bytes are a decode warning, never an error: the field is logged
/// and decoding continues with U+FFFD substituted.
pub fn decode_text_lossy(bytes: &[u8], field: &str) -> String {
    let text = match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => {
            warn!(field, "invalid UTF-8 replaced while decoding text field");
            s
        }
    };
    trim_nul(&text).to_string()
}

/// Decode a nul-padded UTF-16LE byte field, replacing invalid code units.
pub fn decode_wide_lossy(bytes: &[u8], field: &str) -> String {
    if bytes.len() % 2 != 0 {
        warn!(field, len = bytes.len(), "odd byte count in UTF-16 field, last byte dropped");
    }
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

    let mut replaced = false;
    let text: String = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                replaced = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();
    if replaced {
        warn!(field, "invalid UTF-16 replaced while decoding text field");
    }
    trim_nul(&text).to_string()
}

pub fn trim_nul(s: &str) -> &str {
    s.trim_matches('\0')
}

/// Encode `text` into exactly `width` bytes, nul padded or truncated.
pub fn encode_fixed(text: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    let n = text.len().min(width);
    out[..n].copy_from_slice(&text[..n]);
    out
}

pub fn encode_wide(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
