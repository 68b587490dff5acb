// src/types.rs
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Identifier of the record that terminates every tag stream.
pub const HEADER_END: &str = "Header_End";

/// PTU tag type enumeration. The discriminant is the on-disk type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TagType {
    Empty = 0xFFFF0008,
    Bool = 0x00000008,
    Int64 = 0x10000008,
    BitSet64 = 0x11000008,
    Color = 0x12000008,
    Float64 = 0x20000008,
    DateTime = 0x21000008,
    Float64Array = 0x2001FFFF,
    AnsiString = 0x4001FFFF,
    WideString = 0x4002FFFF,
    BinaryBlob = 0xFFFFFFFF,
}

impl TagType {
    pub const ALL: [TagType; 11] = [
        TagType::Empty,
        TagType::Bool,
        TagType::Int64,
        TagType::BitSet64,
        TagType::Color,
        TagType::Float64,
        TagType::DateTime,
        TagType::Float64Array,
        TagType::AnsiString,
        TagType::WideString,
        TagType::BinaryBlob,
    ];

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0xFFFF0008 => Some(TagType::Empty),
            0x00000008 => Some(TagType::Bool),
            0x10000008 => Some(TagType::Int64),
            0x11000008 => Some(TagType::BitSet64),
            0x12000008 => Some(TagType::Color),
            0x20000008 => Some(TagType::Float64),
            0x21000008 => Some(TagType::DateTime),
            0x2001FFFF => Some(TagType::Float64Array),
            0x4001FFFF => Some(TagType::AnsiString),
            0x4002FFFF => Some(TagType::WideString),
            0xFFFFFFFF => Some(TagType::BinaryBlob),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// True for types whose 8-byte slot is a length followed by a payload.
    pub fn is_variable_length(&self) -> bool {
        matches!(
            self,
            TagType::Float64Array | TagType::AnsiString | TagType::WideString | TagType::BinaryBlob
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagType::Empty => "Empty8",
            TagType::Bool => "Bool8",
            TagType::Int64 => "Int8",
            TagType::BitSet64 => "BitSet64",
            TagType::Color => "Color8",
            TagType::Float64 => "Float8",
            TagType::DateTime => "TDateTime",
            TagType::Float64Array => "Float8Array",
            TagType::AnsiString => "AnsiString",
            TagType::WideString => "WideString",
            TagType::BinaryBlob => "BinaryBlob",
        }
    }
}

/// TTTR record formats as stored in `TTResultFormat_TTTRRecType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RecordType {
    PicoHarpT3 = 0x00010303,
    PicoHarpT2 = 0x00010203,
    HydraHarpT3 = 0x00010304,
    HydraHarpT2 = 0x00010204,
    HydraHarp2T3 = 0x01010304,
    HydraHarp2T2 = 0x01010204,
    TimeHarp260NT3 = 0x00010305,
    TimeHarp260NT2 = 0x00010205,
    TimeHarp260PT3 = 0x00010306,
    TimeHarp260PT2 = 0x00010206,
    MultiHarpNT3 = 0x00010307,
    MultiHarpNT2 = 0x00010207,
}

impl RecordType {
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0x00010303 => Some(RecordType::PicoHarpT3),
            0x00010203 => Some(RecordType::PicoHarpT2),
            0x00010304 => Some(RecordType::HydraHarpT3),
            0x00010204 => Some(RecordType::HydraHarpT2),
            0x01010304 => Some(RecordType::HydraHarp2T3),
            0x01010204 => Some(RecordType::HydraHarp2T2),
            0x00010305 => Some(RecordType::TimeHarp260NT3),
            0x00010205 => Some(RecordType::TimeHarp260NT2),
            0x00010306 => Some(RecordType::TimeHarp260PT3),
            0x00010206 => Some(RecordType::TimeHarp260PT2),
            0x00010307 => Some(RecordType::MultiHarpNT3),
            0x00010207 => Some(RecordType::MultiHarpNT2),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        *self as u32 as i64
    }
}

/// OLE automation date: days since 1899-12-30 00:00:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct OleDate(pub f64);

impl OleDate {
    /// OLE day number of 1970-01-01.
    pub const UNIX_EPOCH_DAYS: f64 = 25569.0;
    pub const SECONDS_PER_DAY: f64 = 86400.0;

    pub fn from_unix_seconds(seconds: f64) -> Self {
        OleDate(seconds / Self::SECONDS_PER_DAY + Self::UNIX_EPOCH_DAYS)
    }

    pub fn to_unix_seconds(&self) -> f64 {
        (self.0 - Self::UNIX_EPOCH_DAYS) * Self::SECONDS_PER_DAY
    }

    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        let seconds = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        };
        Self::from_unix_seconds(seconds)
    }

    pub fn from_datetime(time: &DateTime<Utc>) -> Self {
        let seconds = time.timestamp() as f64 + time.timestamp_subsec_nanos() as f64 * 1e-9;
        Self::from_unix_seconds(seconds)
    }

    /// Calendar time, or `None` if the value is outside chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let seconds = self.to_unix_seconds();
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
        DateTime::from_timestamp(whole as i64, nanos)
    }

    /// `None` for NaN, infinities and values `SystemTime` cannot hold.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let seconds = self.to_unix_seconds();
        let offset = Duration::try_from_secs_f64(seconds.abs()).ok()?;
        if seconds >= 0.0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }
}

/// Value of a tag. One variant per [`TagType`].
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Empty,
    Bool(bool),
    Int64(i64),
    BitSet64(i64),
    Color(i64),
    Float64(f64),
    DateTime(OleDate),
    Float64Array(Vec<f64>),
    /// `len` is the on-disk byte length, including nul padding.
    AnsiString { len: u64, text: String },
    /// `len` is the on-disk byte length of the UTF-16LE data, including padding.
    WideString { len: u64, text: String },
    BinaryBlob(Vec<u8>),
}

impl TagValue {
    pub fn tag_type(&self) -> TagType {
        match self {
            TagValue::Empty => TagType::Empty,
            TagValue::Bool(_) => TagType::Bool,
            TagValue::Int64(_) => TagType::Int64,
            TagValue::BitSet64(_) => TagType::BitSet64,
            TagValue::Color(_) => TagType::Color,
            TagValue::Float64(_) => TagType::Float64,
            TagValue::DateTime(_) => TagType::DateTime,
            TagValue::Float64Array(_) => TagType::Float64Array,
            TagValue::AnsiString { .. } => TagType::AnsiString,
            TagValue::WideString { .. } => TagType::WideString,
            TagValue::BinaryBlob(_) => TagType::BinaryBlob,
        }
    }

    /// ANSI string with a nul terminator, padded to a multiple of 8 bytes.
    pub fn ansi(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = padded_len(text.len() + 1);
        TagValue::AnsiString { len, text }
    }

    /// Wide string with a UTF-16 nul terminator, padded to a multiple of 8 bytes.
    pub fn wide(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = padded_len(text.encode_utf16().count() * 2 + 2);
        TagValue::WideString { len, text }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TagValue::Int64(v) | TagValue::BitSet64(v) | TagValue::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::AnsiString { text, .. } | TagValue::WideString { text, .. } => Some(text),
            _ => None,
        }
    }
}

fn padded_len(n: usize) -> u64 {
    (n.div_ceil(8) * 8) as u64
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Empty => write!(f, "<empty Tag>"),
            TagValue::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            TagValue::Int64(v) | TagValue::BitSet64(v) | TagValue::Color(v) => write!(f, "{}", v),
            TagValue::Float64(v) => write!(f, "{}", v),
            TagValue::DateTime(d) => match d.to_datetime() {
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
                None => write!(f, "{} (OLE)", d.0),
            },
            TagValue::Float64Array(v) => write!(f, "<{} floats>", v.len()),
            TagValue::AnsiString { text, .. } | TagValue::WideString { text, .. } => write!(f, "{}", text),
            TagValue::BinaryBlob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// A single `(identifier, index, value)` entry of a tag stream.
#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub ident: String,
    /// `-1` when the tag is not indexed.
    pub index: i32,
    pub value: TagValue,
}

impl TagRecord {
    pub const NO_INDEX: i32 = -1;

    pub fn new(ident: impl Into<String>, index: i32, value: TagValue) -> Self {
        TagRecord { ident: ident.into(), index, value }
    }

    pub fn tag_type(&self) -> TagType {
        self.value.tag_type()
    }

    pub fn is_header_end(&self) -> bool {
        self.ident == HEADER_END
    }

    /// `ident(index)` for indexed tags, plain `ident` otherwise.
    pub fn display_name(&self) -> String {
        if self.index > Self::NO_INDEX {
            format!("{}({})", self.ident, self.index)
        } else {
            self.ident.clone()
        }
    }
}

/// Ordered tag records. Order is the on-disk order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSequence {
    records: Vec<TagRecord>,
}

impl TagSequence {
    pub fn new() -> Self {
        TagSequence { records: Vec::new() }
    }

    pub fn push(&mut self, record: TagRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TagRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TagRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TagRecord> {
        self.records
    }

    pub fn get(&self, ident: &str, index: i32) -> Option<&TagRecord> {
        self.records.iter().find(|r| r.ident == ident && r.index == index)
    }

    /// First record with this identifier, whatever its index.
    pub fn find(&self, ident: &str) -> Option<&TagRecord> {
        self.records.iter().find(|r| r.ident == ident)
    }

    /// Exactly one `Header_End`, last, of type Empty.
    pub fn is_terminated(&self) -> bool {
        let ends = self.records.iter().filter(|r| r.is_header_end()).count();
        matches!(self.records.last(), Some(last) if last.is_header_end() && last.value == TagValue::Empty)
            && ends == 1
    }

    pub fn record_type(&self) -> Option<RecordType> {
        self.find("TTResultFormat_TTTRRecType")
            .and_then(|r| r.value.as_i64())
            .and_then(RecordType::from_i64)
    }
}

impl From<Vec<TagRecord>> for TagSequence {
    fn from(records: Vec<TagRecord>) -> Self {
        TagSequence { records }
    }
}

impl FromIterator<TagRecord> for TagSequence {
    fn from_iter<I: IntoIterator<Item = TagRecord>>(iter: I) -> Self {
        TagSequence { records: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a TagSequence {
    type Item = &'a TagRecord;
    type IntoIter = std::slice::Iter<'a, TagRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for TagSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{:<40} {}", record.display_name(), record.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_roundtrip() {
        for ty in TagType::ALL {
            assert_eq!(TagType::from_u32(ty.code()), Some(ty));
        }
        assert_eq!(TagType::from_u32(0x00000000), None);
        assert_eq!(TagType::Empty.code(), 0xFFFF0008);
        assert_eq!(TagType::BinaryBlob.code(), 0xFFFFFFFF);
    }

    #[test]
    fn test_ole_epoch() {
        assert_eq!(OleDate::from_unix_seconds(0.0), OleDate(25569.0));
        assert_eq!(OleDate(25569.0).to_unix_seconds(), 0.0);
        let dt = OleDate(25569.0).to_datetime().unwrap();
        assert_eq!(dt.timestamp(), 0);
    }

    #[test]
    fn test_ole_out_of_range_has_no_system_time() {
        assert_eq!(OleDate(f64::NAN).to_system_time(), None);
        assert_eq!(OleDate(f64::INFINITY).to_system_time(), None);
        assert_eq!(OleDate(1e300).to_system_time(), None);
        assert_eq!(OleDate(-1e300).to_system_time(), None);
        assert_eq!(OleDate(f64::NAN).to_datetime(), None);
        assert_eq!(OleDate(25569.0).to_system_time(), Some(UNIX_EPOCH));
    }

    #[test]
    fn test_ole_now_is_recent() {
        // 2020-01-01 is OLE day 43831
        assert!(OleDate::now().0 > 43831.0);
    }

    #[test]
    fn test_string_constructors_pad_to_eight() {
        assert_eq!(TagValue::ansi("PicoHarp"), TagValue::AnsiString { len: 16, text: "PicoHarp".into() });
        assert_eq!(TagValue::ansi("abc"), TagValue::AnsiString { len: 8, text: "abc".into() });
        assert_eq!(TagValue::wide("abc"), TagValue::WideString { len: 8, text: "abc".into() });
    }

    #[test]
    fn test_sequence_termination() {
        let mut seq = TagSequence::new();
        seq.push(TagRecord::new("File_GUID", -1, TagValue::ansi("{x}")));
        assert!(!seq.is_terminated());
        seq.push(TagRecord::new(HEADER_END, -1, TagValue::Empty));
        assert!(seq.is_terminated());
        seq.push(TagRecord::new(HEADER_END, -1, TagValue::Empty));
        assert!(!seq.is_terminated());
    }

    #[test]
    fn test_lookup_and_record_type() {
        let seq: TagSequence = vec![
            TagRecord::new("TTResult_InputRate", 0, TagValue::Int64(10)),
            TagRecord::new("TTResult_InputRate", 1, TagValue::Int64(20)),
            TagRecord::new("TTResultFormat_TTTRRecType", -1, TagValue::Int64(0x00010203)),
        ]
        .into();
        assert_eq!(seq.get("TTResult_InputRate", 1).unwrap().value, TagValue::Int64(20));
        assert_eq!(seq.find("TTResult_InputRate").unwrap().index, 0);
        assert_eq!(seq.record_type(), Some(RecordType::PicoHarpT2));
        assert_eq!(seq.get("TTResult_InputRate", 1).unwrap().display_name(), "TTResult_InputRate(1)");
    }
}
