// tests/common/mod.rs
#![allow(dead_code)]

use pqtttr::{OleDate, TagRecord, TagSequence, TagValue, HEADER_END};

/// Builds legacy PicoHarp headers byte by byte.
pub struct LegacyFileBuilder {
    pub comment: Vec<u8>,
    pub file_time: String,
    pub boards: i32,
    pub mode: i32,
    pub acquisition_time_ms: i32,
    pub input_rate0: i32,
    pub input_rate1: i32,
    pub number_of_records: i32,
    pub special_header_words: i32,
    pub payload: Vec<u8>,
}

impl Default for LegacyFileBuilder {
    fn default() -> Self {
        LegacyFileBuilder {
            comment: b"test measurement".to_vec(),
            file_time: "08/04/23 14:05:31".to_string(),
            boards: 1,
            mode: 2,
            acquisition_time_ms: 600000,
            input_rate0: 500000,
            input_rate1: 450000,
            number_of_records: 6567632,
            special_header_words: 0,
            payload: vec![0x01, 0x02, 0x03, 0x04],
        }
    }
}

fn fixed(out: &mut Vec<u8>, text: &[u8], width: usize) {
    let mut field = vec![0u8; width];
    let n = text.len().min(width);
    field[..n].copy_from_slice(&text[..n]);
    out.extend_from_slice(&field);
}

fn int(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn float(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}

impl LegacyFileBuilder {
    /// Header bytes only, up to and including the special header words.
    pub fn header(&self) -> Vec<u8> {
        let mut out = Vec::new();
        fixed(&mut out, b"PicoHarp 300", 16);
        fixed(&mut out, b"2.0", 6);
        fixed(&mut out, b"PicoHarp Software", 18);
        fixed(&mut out, b"2.3.0.0", 12);
        fixed(&mut out, self.file_time.as_bytes(), 18);
        fixed(&mut out, b"\r\n", 2);
        fixed(&mut out, &self.comment, 256);

        // 18 measurement settings
        let measurement = [
            1, 32, 1, self.boards, 0, self.mode, 0, 0, 0, self.acquisition_time_ms,
            65535, 1, 0, 0, 0, 200, 1, 10000,
        ];
        for v in measurement {
            int(&mut out, v);
        }

        // Display curves, parameters, repeat settings, script name
        for i in 0..8 {
            int(&mut out, i);
            int(&mut out, 1);
        }
        for _ in 0..3 {
            float(&mut out, 0.0);
            float(&mut out, 1.0);
            float(&mut out, 10.0);
        }
        for v in [0, 1, 1, 0] {
            int(&mut out, v);
        }
        fixed(&mut out, b"none", 20);

        for b in 0..self.boards {
            fixed(&mut out, b"PicoHarp 300", 16);
            fixed(&mut out, b"2.0", 8);
            int(&mut out, 1020000 + b);
            int(&mut out, 8);
            int(&mut out, 10);
            int(&mut out, 100);
            int(&mut out, 10);
            int(&mut out, 50);
            float(&mut out, 0.004);
            int(&mut out, 0);
            int(&mut out, 0);
            for c in 0..4 {
                for v in [c, -100, 0, 0, 0, 0] {
                    int(&mut out, v);
                }
            }
        }

        let tttr = [
            0, 0, 0, self.input_rate0, self.input_rate1, self.acquisition_time_ms, 0,
            self.number_of_records, self.special_header_words,
        ];
        for v in tttr {
            int(&mut out, v);
        }
        for w in 0..self.special_header_words.max(0) {
            int(&mut out, 0x7E7E0000 | w);
        }
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = self.header();
        out.extend_from_slice(&self.payload);
        out
    }
}

/// A PicoHarp T2 header template in the tag layout written by PicoQuant software.
pub fn picoharp_template() -> TagSequence {
    vec![
        TagRecord::new("File_GUID", -1, TagValue::ansi("{A3E1C2B0-5D4F-4A7E-9C1B-2F3D4E5A6B7C}")),
        TagRecord::new("File_AssuredContent", -1, TagValue::ansi("PicoHarp 300: HWSETG SWSETG")),
        TagRecord::new("CreatorSW_ContentVersion", -1, TagValue::ansi("3.0")),
        TagRecord::new("CreatorSW_Name", -1, TagValue::ansi("PicoHarp Software")),
        TagRecord::new("CreatorSW_Version", -1, TagValue::ansi("3.0.0.3")),
        TagRecord::new("File_CreatingTime", -1, TagValue::DateTime(OleDate(43831.5))),
        TagRecord::new("File_Comment", -1, TagValue::wide("T2 Mode")),
        TagRecord::new("Measurement_Mode", -1, TagValue::Int64(2)),
        TagRecord::new("Measurement_SubMode", -1, TagValue::Int64(0)),
        TagRecord::new("TTResult_StopReason", -1, TagValue::Int64(0)),
        TagRecord::new("Fast_Load_End", -1, TagValue::Empty),
        TagRecord::new("TTResultFormat_TTTRRecType", -1, TagValue::Int64(0x00010203)),
        TagRecord::new("TTResultFormat_BitsPerRecord", -1, TagValue::Int64(32)),
        TagRecord::new("MeasDesc_BinningFactor", -1, TagValue::Int64(1)),
        TagRecord::new("MeasDesc_Offset", -1, TagValue::Int64(0)),
        TagRecord::new("MeasDesc_AcquisitionTime", -1, TagValue::Int64(1000)),
        TagRecord::new("MeasDesc_StopAt", -1, TagValue::Int64(4294967295)),
        TagRecord::new("MeasDesc_StopOnOvfl", -1, TagValue::Bool(true)),
        TagRecord::new("MeasDesc_Restart", -1, TagValue::Bool(false)),
        TagRecord::new("CurSWSetting_DispLog", -1, TagValue::Bool(false)),
        TagRecord::new("CurSWSetting_DispCurve_MapTo", 0, TagValue::Int64(0)),
        TagRecord::new("CurSWSetting_DispCurve_Show", 0, TagValue::Bool(true)),
        TagRecord::new("HW_Type", -1, TagValue::ansi("PicoHarp")),
        TagRecord::new("HW_PartNo", -1, TagValue::ansi("930004")),
        TagRecord::new("HW_Version", -1, TagValue::ansi("2.0")),
        TagRecord::new("HW_SerialNo", -1, TagValue::ansi("1020000")),
        TagRecord::new("HW_Markers", -1, TagValue::BitSet64(0b1111)),
        TagRecord::new("MeasDesc_Resolution", -1, TagValue::Float64(4e-12)),
        TagRecord::new("MeasDesc_GlobalResolution", -1, TagValue::Float64(4e-12)),
        TagRecord::new("HWSync_Divider", -1, TagValue::Int64(8)),
        TagRecord::new("HWInpChan_CFDLevel", 0, TagValue::Int64(100)),
        TagRecord::new("HWInpChan_CFDZeroCross", 0, TagValue::Int64(10)),
        TagRecord::new("TTResult_SyncRate", -1, TagValue::Int64(1)),
        TagRecord::new("TTResult_InputRate", 0, TagValue::Int64(2)),
        TagRecord::new("TTResult_StopAfter", -1, TagValue::Int64(1000)),
        TagRecord::new("TTResult_NumberOfRecords", -1, TagValue::Int64(3)),
        TagRecord::new("ImgHdr_Dimensions", -1, TagValue::Int64(0)),
        TagRecord::new(HEADER_END, -1, TagValue::Empty),
    ]
    .into()
}
