// src/tags/writer.rs
use crate::error::{PtuError, Result};
use crate::tags::{HeaderOverrides, IDENT_WIDTH, MAGIC, MAX_STRING_LEN, VERSION};
use crate::types::{OleDate, TagRecord, TagSequence, TagValue};
use crate::utils::{encode_fixed, encode_wide};
use byteorder::{LittleEndian, WriteBytesExt};
use bytes::{BufMut, BytesMut};
use std::io::Write;
use tracing::{debug, warn};

/// Serialize `template` as a tag stream into a fresh buffer.
pub fn encode_tag_stream(template: &TagSequence, overrides: &HeaderOverrides) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(16 + template.len() * 48).writer();
    write_tag_stream(&mut buf, template, overrides)?;
    Ok(buf.into_inner().to_vec())
}

/// Serialize `template` as a tag stream, substituting `overrides`.
///
/// Int64 tags named in [`crate::tags::OVERRIDE_TARGETS`] take the override
/// value when it is set. Every DateTime tag is written with the override
/// creation time, or the current wall-clock time when none is given.
pub fn write_tag_stream<W: Write>(
    writer: &mut W,
    template: &TagSequence,
    overrides: &HeaderOverrides,
) -> Result<()> {
    writer.write_all(&encode_fixed(MAGIC.as_bytes(), 8))?;
    writer.write_all(&encode_fixed(VERSION.as_bytes(), 8))?;

    let created = match &overrides.creation_time {
        Some(time) => OleDate::from_datetime(time),
        None => {
            let now = OleDate::now();
            debug!(ole = now.0, "no creation time supplied, using current time");
            now
        }
    };

    for record in template {
        write_record(writer, record, overrides, created)?;
    }
    Ok(())
}

fn write_record<W: Write>(
    writer: &mut W,
    record: &TagRecord,
    overrides: &HeaderOverrides,
    created: OleDate,
) -> Result<()> {
    if record.ident.len() > IDENT_WIDTH {
        return Err(PtuError::IdentifierTooLong(record.ident.clone()));
    }
    writer.write_all(&encode_fixed(record.ident.as_bytes(), IDENT_WIDTH))?;
    writer.write_i32::<LittleEndian>(record.index)?;
    writer.write_u32::<LittleEndian>(record.tag_type().code())?;

    match &record.value {
        TagValue::Empty => writer.write_all(&[0u8; 8])?,
        TagValue::Bool(v) => writer.write_i64::<LittleEndian>(i64::from(*v))?,
        TagValue::Int64(v) => {
            let value = match overrides.int_for(&record.ident) {
                Some(o) => {
                    debug!(tag = %record.display_name(), template = v, value = o, "override applied");
                    o
                }
                None => *v,
            };
            writer.write_i64::<LittleEndian>(value)?;
        }
        TagValue::BitSet64(v) | TagValue::Color(v) => writer.write_i64::<LittleEndian>(*v)?,
        TagValue::Float64(v) => writer.write_f64::<LittleEndian>(*v)?,
        TagValue::DateTime(_) => writer.write_f64::<LittleEndian>(created.0)?,
        TagValue::Float64Array(values) => {
            writer.write_i64::<LittleEndian>((values.len() * 8) as i64)?;
            for v in values {
                writer.write_f64::<LittleEndian>(*v)?;
            }
        }
        TagValue::AnsiString { len, text } => {
            write_padded(writer, &record.ident, text.as_bytes(), *len)?;
        }
        TagValue::WideString { len, text } => {
            write_padded(writer, &record.ident, &encode_wide(text), *len)?;
        }
        TagValue::BinaryBlob(data) => {
            writer.write_i64::<LittleEndian>(data.len() as i64)?;
            writer.write_all(data)?;
        }
    }
    Ok(())
}

fn write_padded<W: Write>(writer: &mut W, ident: &str, data: &[u8], len: u64) -> Result<()> {
    if len > MAX_STRING_LEN {
        return Err(PtuError::UnsupportedRecordLayout(format!(
            "{}: string length {} exceeds {} bytes",
            ident, len, MAX_STRING_LEN
        )));
    }
    let width = len as usize;
    if data.len() > width {
        warn!(tag = ident, len, needed = data.len(), "string longer than its stored length, truncating");
    }
    writer.write_i64::<LittleEndian>(len as i64)?;
    writer.write_all(&encode_fixed(data, width))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::read_tag_stream;
    use crate::types::HEADER_END;
    use chrono::{TimeZone, Utc};

    fn template() -> TagSequence {
        vec![
            TagRecord::new("File_GUID", -1, TagValue::ansi("{6AD6F4EF}")),
            TagRecord::new("File_CreatingTime", -1, TagValue::DateTime(OleDate(40000.0))),
            TagRecord::new("MeasDesc_AcquisitionTime", -1, TagValue::Int64(1000)),
            TagRecord::new("TTResult_StopAfter", -1, TagValue::Int64(1000)),
            TagRecord::new("TTResult_InputRate", 0, TagValue::Int64(1)),
            TagRecord::new("TTResult_NumberOfRecords", -1, TagValue::Int64(7)),
            TagRecord::new(HEADER_END, -1, TagValue::Empty),
        ]
        .into()
    }

    #[test]
    fn test_preamble() {
        let bytes = encode_tag_stream(&template(), &HeaderOverrides::new()).unwrap();
        assert_eq!(&bytes[..8], b"PQTTTR\0\0");
        assert_eq!(&bytes[8..16], b"1.0.00\0\0");
        assert_eq!(&bytes[16..25], b"File_GUID");
    }

    #[test]
    fn test_override_precedence() {
        let overrides = HeaderOverrides::new().acquisition_time_ms(600000).input_rate(450000);
        let bytes = encode_tag_stream(&template(), &overrides).unwrap();
        let tags = read_tag_stream(&bytes).unwrap();

        assert_eq!(tags.find("MeasDesc_AcquisitionTime").unwrap().value, TagValue::Int64(600000));
        assert_eq!(tags.find("TTResult_StopAfter").unwrap().value, TagValue::Int64(600000));
        assert_eq!(tags.get("TTResult_InputRate", 0).unwrap().value, TagValue::Int64(450000));
        // Not supplied: template value passes through
        assert_eq!(tags.find("TTResult_NumberOfRecords").unwrap().value, TagValue::Int64(7));
    }

    #[test]
    fn test_creation_time_override() {
        let time = Utc.with_ymd_and_hms(2023, 4, 8, 12, 30, 0).unwrap();
        let overrides = HeaderOverrides::new().creation_time(time);
        let bytes = encode_tag_stream(&template(), &overrides).unwrap();
        let tags = read_tag_stream(&bytes).unwrap();

        match tags.find("File_CreatingTime").unwrap().value {
            TagValue::DateTime(d) => {
                let seconds = d.to_unix_seconds();
                assert!((seconds - time.timestamp() as f64).abs() < 1e-3);
            }
            ref other => panic!("Expected DateTime, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_too_long() {
        let seq: TagSequence = vec![TagRecord::new("X".repeat(33), -1, TagValue::Empty)].into();
        assert!(matches!(
            encode_tag_stream(&seq, &HeaderOverrides::new()),
            Err(PtuError::IdentifierTooLong(_))
        ));
    }

    #[test]
    fn test_overlong_string_truncated_to_len() {
        let seq: TagSequence = vec![
            TagRecord::new("File_Comment", -1, TagValue::AnsiString { len: 4, text: "abcdefgh".into() }),
            TagRecord::new(HEADER_END, -1, TagValue::Empty),
        ]
        .into();
        let bytes = encode_tag_stream(&seq, &HeaderOverrides::new()).unwrap();
        let tags = read_tag_stream(&bytes).unwrap();
        assert_eq!(tags.records()[0].value, TagValue::AnsiString { len: 4, text: "abcd".into() });
    }

    #[test]
    fn test_oversized_string_len_is_an_error() {
        for len in [u64::MAX, MAX_STRING_LEN + 1] {
            let seq: TagSequence = vec![
                TagRecord::new("File_Comment", -1, TagValue::AnsiString { len, text: "x".into() }),
                TagRecord::new(HEADER_END, -1, TagValue::Empty),
            ]
            .into();
            assert!(matches!(
                encode_tag_stream(&seq, &HeaderOverrides::new()),
                Err(PtuError::UnsupportedRecordLayout(_))
            ));
        }
    }
}
