// src/tags/overrides.rs
use crate::legacy::LegacyHeader;
use chrono::{DateTime, Utc};

/// Value slots that can be substituted into a template while writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSlot {
    AcquisitionTime,
    NumberOfRecords,
    SyncRate,
    InputRate,
}

/// Int64 identifiers that receive an override, and the slot feeding each.
///
/// `TTResult_StopAfter` shares the acquisition time: a legacy run stops when
/// its acquisition time elapses. `TTResult_InputRate` matches every index.
pub const OVERRIDE_TARGETS: &[(&str, OverrideSlot)] = &[
    ("MeasDesc_AcquisitionTime", OverrideSlot::AcquisitionTime),
    ("TTResult_StopAfter", OverrideSlot::AcquisitionTime),
    ("TTResult_NumberOfRecords", OverrideSlot::NumberOfRecords),
    ("TTResult_SyncRate", OverrideSlot::SyncRate),
    ("TTResult_InputRate", OverrideSlot::InputRate),
];

impl OverrideSlot {
    pub fn for_ident(ident: &str) -> Option<OverrideSlot> {
        OVERRIDE_TARGETS
            .iter()
            .find(|(name, _)| *name == ident)
            .map(|(_, slot)| *slot)
    }
}

/// Runtime values substituted into the template header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderOverrides {
    pub acquisition_time_ms: Option<i64>,
    pub number_of_records: Option<i64>,
    /// Written to every DateTime tag. `None` means "now".
    pub creation_time: Option<DateTime<Utc>>,
    pub sync_rate: Option<i64>,
    pub input_rate: Option<i64>,
}

impl HeaderOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquisition_time_ms(mut self, value: i64) -> Self {
        self.acquisition_time_ms = Some(value);
        self
    }

    pub fn number_of_records(mut self, value: i64) -> Self {
        self.number_of_records = Some(value);
        self
    }

    pub fn creation_time(mut self, value: DateTime<Utc>) -> Self {
        self.creation_time = Some(value);
        self
    }

    pub fn sync_rate(mut self, value: i64) -> Self {
        self.sync_rate = Some(value);
        self
    }

    pub fn input_rate(mut self, value: i64) -> Self {
        self.input_rate = Some(value);
        self
    }

    /// Values carried over from a legacy header.
    pub fn from_legacy(header: &LegacyHeader) -> Self {
        HeaderOverrides {
            acquisition_time_ms: Some(header.measurement.acquisition_time_ms as i64),
            number_of_records: Some(header.tttr.number_of_records as i64),
            creation_time: Some(header.created),
            sync_rate: Some(header.tttr.input_rate0 as i64),
            input_rate: Some(header.tttr.input_rate1 as i64),
        }
    }

    pub fn slot(&self, slot: OverrideSlot) -> Option<i64> {
        match slot {
            OverrideSlot::AcquisitionTime => self.acquisition_time_ms,
            OverrideSlot::NumberOfRecords => self.number_of_records,
            OverrideSlot::SyncRate => self.sync_rate,
            OverrideSlot::InputRate => self.input_rate,
        }
    }

    /// Override for an Int64 tag, if `ident` is a target and its slot is set.
    pub fn int_for(&self, ident: &str) -> Option<i64> {
        OverrideSlot::for_ident(ident).and_then(|slot| self.slot(slot))
    }
}
