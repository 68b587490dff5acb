// src/template.rs
//! Persisted header templates.
//!
//! A template is a known-good tag sequence stored as four parallel arrays
//! (identifiers, indices, type codes, values) in JSON. Loading one yields
//! the [`TagSequence`] the writer re-emits with new values substituted.

use crate::error::{PtuError, Result};
use crate::tags::MAX_STRING_LEN;
use crate::types::{OleDate, TagRecord, TagSequence, TagType, TagValue};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Value column of a snapshot. The matching type code decides how it is read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SnapshotValue {
    Unit,
    Int(i64),
    Float(f64),
    Text(u64, String),
    Floats(Vec<f64>),
    Blob { blob: Vec<u8> },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TemplateSnapshot {
    pub ident: Vec<String>,
    pub tag_idx: Vec<i32>,
    pub tag_typ: Vec<u32>,
    pub tag_values: Vec<SnapshotValue>,
}

impl TemplateSnapshot {
    pub fn from_sequence(tags: &TagSequence) -> Self {
        let mut snapshot = TemplateSnapshot::default();
        for record in tags {
            snapshot.ident.push(record.ident.clone());
            snapshot.tag_idx.push(record.index);
            snapshot.tag_typ.push(record.tag_type().code());
            snapshot.tag_values.push(snapshot_value(&record.value));
        }
        snapshot
    }

    pub fn to_sequence(&self) -> Result<TagSequence> {
        let n = self.ident.len();
        if self.tag_idx.len() != n || self.tag_typ.len() != n || self.tag_values.len() != n {
            return Err(PtuError::Snapshot(format!(
                "column lengths differ: ident {}, tag_idx {}, tag_typ {}, tag_values {}",
                n,
                self.tag_idx.len(),
                self.tag_typ.len(),
                self.tag_values.len()
            )));
        }

        (0..n)
            .map(|i| {
                let code = self.tag_typ[i];
                let tag_type = TagType::from_u32(code).ok_or_else(|| {
                    PtuError::Snapshot(format!("{}: unknown type code 0x{:08X}", self.ident[i], code))
                })?;
                let value = tag_value(tag_type, &self.tag_values[i]).ok_or_else(|| {
                    PtuError::Snapshot(format!(
                        "{}: value {:?} does not match type {}",
                        self.ident[i],
                        self.tag_values[i],
                        tag_type.name()
                    ))
                })?;
                if let TagValue::AnsiString { len, .. } | TagValue::WideString { len, .. } = &value {
                    if *len > MAX_STRING_LEN {
                        return Err(PtuError::Snapshot(format!(
                            "{}: string length {} exceeds {} bytes",
                            self.ident[i], len, MAX_STRING_LEN
                        )));
                    }
                }
                Ok(TagRecord::new(self.ident[i].clone(), self.tag_idx[i], value))
            })
            .collect()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let snapshot: TemplateSnapshot = serde_json::from_reader(reader)?;
        debug!(path = %path.display(), tags = snapshot.ident.len(), "template snapshot loaded");
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Load a template file straight into a tag sequence.
pub fn load_template(path: impl AsRef<Path>) -> Result<TagSequence> {
    TemplateSnapshot::load(path)?.to_sequence()
}

pub fn save_template(tags: &TagSequence, path: impl AsRef<Path>) -> Result<()> {
    TemplateSnapshot::from_sequence(tags).save(path)
}

fn snapshot_value(value: &TagValue) -> SnapshotValue {
    match value {
        TagValue::Empty => SnapshotValue::Unit,
        TagValue::Bool(v) => SnapshotValue::Int(i64::from(*v)),
        TagValue::Int64(v) | TagValue::BitSet64(v) | TagValue::Color(v) => SnapshotValue::Int(*v),
        TagValue::Float64(v) => SnapshotValue::Float(*v),
        TagValue::DateTime(d) => SnapshotValue::Float(d.0),
        TagValue::Float64Array(v) => SnapshotValue::Floats(v.clone()),
        TagValue::AnsiString { len, text } | TagValue::WideString { len, text } => {
            SnapshotValue::Text(*len, text.clone())
        }
        TagValue::BinaryBlob(v) => SnapshotValue::Blob { blob: v.clone() },
    }
}

fn tag_value(tag_type: TagType, value: &SnapshotValue) -> Option<TagValue> {
    use SnapshotValue as S;
    let v = match (tag_type, value) {
        (TagType::Empty, _) => TagValue::Empty,
        (TagType::Bool, S::Int(v)) => TagValue::Bool(*v != 0),
        (TagType::Int64, S::Int(v)) => TagValue::Int64(*v),
        (TagType::BitSet64, S::Int(v)) => TagValue::BitSet64(*v),
        (TagType::Color, S::Int(v)) => TagValue::Color(*v),
        (TagType::Float64, S::Float(v)) => TagValue::Float64(*v),
        (TagType::Float64, S::Int(v)) => TagValue::Float64(*v as f64),
        (TagType::DateTime, S::Float(v)) => TagValue::DateTime(OleDate(*v)),
        (TagType::DateTime, S::Int(v)) => TagValue::DateTime(OleDate(*v as f64)),
        (TagType::Float64Array, S::Floats(v)) => TagValue::Float64Array(v.clone()),
        (TagType::AnsiString, S::Text(len, text)) => TagValue::AnsiString { len: *len, text: text.clone() },
        (TagType::WideString, S::Text(len, text)) => TagValue::WideString { len: *len, text: text.clone() },
        (TagType::BinaryBlob, S::Blob { blob }) => TagValue::BinaryBlob(blob.clone()),
        _ => return None,
    };
    Some(v)
}
