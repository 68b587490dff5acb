// src/legacy/header.rs
use crate::types::RecordType;
use chrono::{DateTime, Utc};
use std::fmt;

/// Largest board count accepted before the header is treated as misaligned.
pub const MAX_BOARDS: i32 = 16;
/// Router channels stored per board.
pub const ROUTER_CHANNELS: usize = 4;

pub const TEXT_BLOCK_LEN: usize = 16 + 6 + 18 + 12 + 18 + 2 + 256;
pub const MEASUREMENT_BLOCK_LEN: usize = MeasurementSettings::NAMES.len() * 4;
pub const DISPLAY_BLOCK_LEN: usize = 8 * 8 + 3 * 12 + 4 * 4 + 20;
pub const BOARD_RECORD_LEN: usize = 16 + 8 + 9 * 4 + ROUTER_CHANNELS * 6 * 4;
pub const TTTR_BLOCK_LEN: usize = TttrSettings::NAMES.len() * 4;

/// A single decoded legacy header value.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyValue {
    Int(i32),
    Float(f32),
    Text(String),
}

impl fmt::Display for LegacyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyValue::Int(v) => write!(f, "{}", v),
            LegacyValue::Float(v) => write!(f, "{}", v),
            LegacyValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Acquisition mode of a legacy file; selects the PTU record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMode {
    T2,
    T3,
}

impl AcquisitionMode {
    pub fn from_measurement_mode(mode: i32) -> Option<Self> {
        match mode {
            2 => Some(AcquisitionMode::T2),
            3 => Some(AcquisitionMode::T3),
            _ => None,
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            AcquisitionMode::T2 => RecordType::PicoHarpT2,
            AcquisitionMode::T3 => RecordType::PicoHarpT3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextHeader {
    pub ident: String,
    pub format_version: String,
    pub creator_name: String,
    pub creator_version: String,
    pub file_time: String,
    pub crlf: String,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementSettings {
    pub number_of_curves: i32,
    pub bits_per_record: i32,
    pub routing_channels: i32,
    pub number_of_boards: i32,
    pub active_curve: i32,
    pub measurement_mode: i32,
    pub sub_mode: i32,
    pub range_no: i32,
    pub offset: i32,
    pub acquisition_time_ms: i32,
    pub stop_at: i32,
    pub stop_on_ovfl: i32,
    pub restart: i32,
    pub display_lin_log: i32,
    pub display_time_axis_from: i32,
    pub display_time_axis_to: i32,
    pub display_count_axis_from: i32,
    pub display_count_axis_to: i32,
}

impl MeasurementSettings {
    pub const NAMES: [&'static str; 18] = [
        "Numberofcurves",
        "Bitsperrecord",
        "Routingchannels",
        "Numberofboards",
        "Activecurve",
        "Measurementmode",
        "Submode",
        "Rangeno",
        "Offset",
        "Acquisitiontime_ms",
        "Stopat",
        "Stoponovfl",
        "Restart",
        "Displaylinlog",
        "Displaytimeaxisfrom",
        "Displaytimeaxisto",
        "Displaycountaxisfrom",
        "Displaycountaxisto",
    ];

    /// Build from the values in on-disk order.
    pub fn from_values(v: [i32; 18]) -> Self {
        MeasurementSettings {
            number_of_curves: v[0],
            bits_per_record: v[1],
            routing_channels: v[2],
            number_of_boards: v[3],
            active_curve: v[4],
            measurement_mode: v[5],
            sub_mode: v[6],
            range_no: v[7],
            offset: v[8],
            acquisition_time_ms: v[9],
            stop_at: v[10],
            stop_on_ovfl: v[11],
            restart: v[12],
            display_lin_log: v[13],
            display_time_axis_from: v[14],
            display_time_axis_to: v[15],
            display_count_axis_from: v[16],
            display_count_axis_to: v[17],
        }
    }

    pub fn values(&self) -> [i32; 18] {
        [
            self.number_of_curves,
            self.bits_per_record,
            self.routing_channels,
            self.number_of_boards,
            self.active_curve,
            self.measurement_mode,
            self.sub_mode,
            self.range_no,
            self.offset,
            self.acquisition_time_ms,
            self.stop_at,
            self.stop_on_ovfl,
            self.restart,
            self.display_lin_log,
            self.display_time_axis_from,
            self.display_time_axis_to,
            self.display_count_axis_from,
            self.display_count_axis_to,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayCurve {
    pub map_to: i32,
    pub show: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayParam {
    pub start: f32,
    pub step: f32,
    pub end: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySettings {
    pub curves: [DisplayCurve; 8],
    pub params: [DisplayParam; 3],
    pub repeat_mode: i32,
    pub repeats_per_curve: i32,
    pub repeat_time: i32,
    pub repeat_wait_time: i32,
    pub script_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterChannel {
    pub input_type: i32,
    pub input_level: i32,
    pub input_edge: i32,
    pub cfd_present: i32,
    pub cfd_level: i32,
    pub cfd_zero_cross: i32,
}

impl RouterChannel {
    pub const NAMES: [&'static str; 6] = [
        "InputType",
        "InputLevel",
        "InputEdge",
        "CFDPresent",
        "CFDLevel",
        "CFDZCross",
    ];

    pub fn values(&self) -> [i32; 6] {
        [
            self.input_type,
            self.input_level,
            self.input_edge,
            self.cfd_present,
            self.cfd_level,
            self.cfd_zero_cross,
        ]
    }
}

/// Per-board hardware record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardRecord {
    pub hardware_ident: String,
    pub hardware_version: String,
    pub hardware_serial: i32,
    pub sync_divider: i32,
    pub cfd_zero_cross0: i32,
    pub cfd_level0: i32,
    pub cfd_zero_cross1: i32,
    pub cfd_level1: i32,
    pub resolution_ns: f32,
    pub router_model_code: i32,
    pub router_enabled: i32,
    pub router_channels: [RouterChannel; ROUTER_CHANNELS],
}

impl BoardRecord {
    pub const NAMES: [&'static str; 11] = [
        "Hardwareident",
        "Hardwareversion",
        "Hardwareserial",
        "Syncdivider",
        "CFDzerocross0",
        "CFDlevel0",
        "CFDzerocross1",
        "CFDlevel1",
        "Resolution_ns",
        "Routermodelcode",
        "Routermodelenabled",
    ];

    fn values(&self) -> [LegacyValue; 11] {
        [
            LegacyValue::Text(self.hardware_ident.clone()),
            LegacyValue::Text(self.hardware_version.clone()),
            LegacyValue::Int(self.hardware_serial),
            LegacyValue::Int(self.sync_divider),
            LegacyValue::Int(self.cfd_zero_cross0),
            LegacyValue::Int(self.cfd_level0),
            LegacyValue::Int(self.cfd_zero_cross1),
            LegacyValue::Int(self.cfd_level1),
            LegacyValue::Float(self.resolution_ns),
            LegacyValue::Int(self.router_model_code),
            LegacyValue::Int(self.router_enabled),
        ]
    }
}

/// T2/T3 acquisition block following the board records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TttrSettings {
    pub ext_devices: i32,
    pub reserved1: i32,
    pub reserved2: i32,
    pub input_rate0: i32,
    pub input_rate1: i32,
    pub stop_after_ms: i32,
    pub stop_reason: i32,
    pub number_of_records: i32,
    /// Count of 32-bit special-header words preceding the event records.
    pub special_header_words: i32,
}

impl TttrSettings {
    pub const NAMES: [&'static str; 9] = [
        "Extdevices",
        "Reserved1",
        "Reserved2",
        "Inprate0",
        "Inprate1",
        "Stopafter_ms",
        "Stopreason",
        "Numrecords",
        "Imghdrsize",
    ];

    pub fn from_values(v: [i32; 9]) -> Self {
        TttrSettings {
            ext_devices: v[0],
            reserved1: v[1],
            reserved2: v[2],
            input_rate0: v[3],
            input_rate1: v[4],
            stop_after_ms: v[5],
            stop_reason: v[6],
            number_of_records: v[7],
            special_header_words: v[8],
        }
    }

    pub fn values(&self) -> [i32; 9] {
        [
            self.ext_devices,
            self.reserved1,
            self.reserved2,
            self.input_rate0,
            self.input_rate1,
            self.stop_after_ms,
            self.stop_reason,
            self.number_of_records,
            self.special_header_words,
        ]
    }
}

/// Fully decoded legacy header. Immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyHeader {
    pub text: TextHeader,
    pub measurement: MeasurementSettings,
    pub display: DisplaySettings,
    pub boards: Vec<BoardRecord>,
    pub tttr: TttrSettings,
    pub mode: AcquisitionMode,
    /// `text.file_time` parsed as UTC.
    pub created: DateTime<Utc>,
    /// Offset of the first event record.
    pub header_len: usize,
}

impl LegacyHeader {
    pub fn record_type(&self) -> RecordType {
        self.mode.record_type()
    }

    /// Named fields in on-disk order. Board fields are suffixed with
    /// `(board)`, router channel fields with `(board,channel)`.
    pub fn entries(&self) -> Vec<(String, LegacyValue)> {
        let t = &self.text;
        let mut out: Vec<(String, LegacyValue)> = [
            ("Ident", &t.ident),
            ("Formatversion", &t.format_version),
            ("Creatorname", &t.creator_name),
            ("Creatorversion", &t.creator_version),
            ("File_CreatingTime", &t.file_time),
            ("Comment", &t.comment),
        ]
        .into_iter()
        .map(|(name, v)| (name.to_string(), LegacyValue::Text(v.clone())))
        .collect();

        for (name, v) in MeasurementSettings::NAMES.iter().zip(self.measurement.values()) {
            out.push((name.to_string(), LegacyValue::Int(v)));
        }
        out.push(("Scriptname".to_string(), LegacyValue::Text(self.display.script_name.clone())));

        for (b, board) in self.boards.iter().enumerate() {
            for (name, v) in BoardRecord::NAMES.iter().zip(board.values()) {
                out.push((format!("{}({})", name, b), v));
            }
            for (c, chan) in board.router_channels.iter().enumerate() {
                for (name, v) in RouterChannel::NAMES.iter().zip(chan.values()) {
                    out.push((format!("{}({},{})", name, b, c), LegacyValue::Int(v)));
                }
            }
        }

        for (name, v) in TttrSettings::NAMES.iter().zip(self.tttr.values()) {
            out.push((name.to_string(), LegacyValue::Int(v)));
        }
        out
    }

    pub fn get(&self, name: &str) -> Option<LegacyValue> {
        self.entries().into_iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

impl fmt::Display for LegacyHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.entries() {
            writeln!(f, "{:<40} {}", name, value)?;
        }
        Ok(())
    }
}
