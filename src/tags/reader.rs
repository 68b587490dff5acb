// src/tags/reader.rs
use crate::error::{PtuError, Result};
use crate::tags::{IDENT_WIDTH, MAGIC};
use crate::types::{OleDate, TagRecord, TagSequence, TagType, TagValue};
use crate::utils::{decode_wide_lossy, ByteCursor, InputBuffer};
use byteorder::{ByteOrder, LittleEndian};
use std::path::Path;
use tracing::debug;

/// A decoded tag-stream header.
#[derive(Debug, Clone, PartialEq)]
pub struct TagStream {
    pub magic: String,
    pub version: String,
    pub tags: TagSequence,
    /// Byte offset of the first event record, i.e. the header size.
    pub header_len: usize,
}

/// Decode a tag stream and return only its records.
pub fn read_tag_stream(bytes: &[u8]) -> Result<TagSequence> {
    Ok(parse_tag_stream(bytes)?.tags)
}

/// Decode magic, version and every record up to and including `Header_End`.
///
/// An unknown type code aborts decoding: the value width is unknown, so no
/// later record can be located.
pub fn parse_tag_stream(bytes: &[u8]) -> Result<TagStream> {
    let mut cursor = ByteCursor::new(bytes);

    let magic = cursor.read_fixed_text(8, "magic")?;
    if magic != MAGIC {
        return Err(PtuError::InvalidTag {
            expected: MAGIC.to_string(),
            found: magic,
        });
    }
    let version = cursor.read_fixed_text(8, "version")?;
    debug!(%magic, %version, "reading tag stream");

    let mut tags = TagSequence::new();
    loop {
        let record = read_record(&mut cursor)?;
        let done = record.is_header_end();
        if done && record.tag_type() != TagType::Empty {
            return Err(PtuError::UnsupportedRecordLayout(format!(
                "{} has type {}, expected {}",
                record.ident,
                record.tag_type().name(),
                TagType::Empty.name()
            )));
        }
        tags.push(record);
        if done {
            break;
        }
    }

    debug!(tags = tags.len(), header_len = cursor.position(), "tag stream decoded");
    Ok(TagStream {
        magic,
        version,
        tags,
        header_len: cursor.position(),
    })
}

fn read_record(cursor: &mut ByteCursor<'_>) -> Result<TagRecord> {
    let ident = cursor.read_fixed_text(IDENT_WIDTH, "tag identifier")?;
    let index = cursor.read_i32()?;
    let code = cursor.read_u32()?;
    let tag_type = TagType::from_u32(code).ok_or(PtuError::UnsupportedTagType {
        code,
        offset: cursor.position(),
    })?;

    let value = match tag_type {
        TagType::Empty => {
            cursor.skip(8)?;
            TagValue::Empty
        }
        TagType::Bool => TagValue::Bool(cursor.read_i64()? != 0),
        TagType::Int64 => TagValue::Int64(cursor.read_i64()?),
        TagType::BitSet64 => TagValue::BitSet64(cursor.read_i64()?),
        TagType::Color => TagValue::Color(cursor.read_i64()?),
        TagType::Float64 => TagValue::Float64(cursor.read_f64()?),
        TagType::DateTime => TagValue::DateTime(OleDate(cursor.read_f64()?)),
        TagType::Float64Array => {
            let len = read_length(cursor, &ident)?;
            if len % 8 != 0 {
                return Err(PtuError::UnsupportedRecordLayout(format!(
                    "{}: float array length {} is not a multiple of 8",
                    ident, len
                )));
            }
            let bytes = cursor.read_bytes(len)?;
            TagValue::Float64Array(bytes.chunks_exact(8).map(LittleEndian::read_f64).collect())
        }
        TagType::AnsiString => {
            let len = read_length(cursor, &ident)?;
            let text = cursor.read_fixed_text(len, &ident)?;
            TagValue::AnsiString { len: len as u64, text }
        }
        TagType::WideString => {
            let len = read_length(cursor, &ident)?;
            let text = decode_wide_lossy(cursor.read_bytes(len)?, &ident);
            TagValue::WideString { len: len as u64, text }
        }
        TagType::BinaryBlob => {
            let len = read_length(cursor, &ident)?;
            TagValue::BinaryBlob(cursor.read_bytes(len)?.to_vec())
        }
    };

    Ok(TagRecord { ident, index, value })
}

fn read_length(cursor: &mut ByteCursor<'_>, ident: &str) -> Result<usize> {
    let len = cursor.read_i64()?;
    usize::try_from(len).map_err(|_| {
        PtuError::UnsupportedRecordLayout(format!("{}: negative payload length {}", ident, len))
    })
}

/// A tagged file loaded into memory: header plus the raw event records.
pub struct PtuFile {
    pub header: TagStream,
    data: InputBuffer,
}

impl PtuFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_buffer(InputBuffer::read(path)?)
    }

    #[cfg(feature = "mmap")]
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_buffer(InputBuffer::map(path)?)
    }

    fn from_buffer(data: InputBuffer) -> Result<Self> {
        let header = parse_tag_stream(&data)?;
        Ok(PtuFile { header, data })
    }

    pub fn tags(&self) -> &TagSequence {
        &self.header.tags
    }

    /// Event records following the header, uninterpreted.
    pub fn records(&self) -> &[u8] {
        &self.data[self.header.header_len..]
    }
}
