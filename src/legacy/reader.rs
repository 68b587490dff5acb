// src/legacy/reader.rs
use crate::error::{PtuError, Result};
use crate::legacy::header::*;
use crate::utils::ByteCursor;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Format of the legacy creation-time text, e.g. `08/04/23 14:05:31`.
pub const FILE_TIME_FORMAT: &str = "%d/%m/%y %H:%M:%S";

/// Decode a legacy PicoHarp header and split off the event payload.
///
/// The payload slice borrows from `bytes` and is never inspected.
pub fn read_legacy_header(bytes: &[u8]) -> Result<(LegacyHeader, &[u8])> {
    let mut cursor = ByteCursor::new(bytes);

    let text = read_text_block(&mut cursor)?;
    debug!(ident = %text.ident, version = %text.format_version, creator = %text.creator_name, "legacy text header");

    let mut values = [0i32; 18];
    for v in values.iter_mut() {
        *v = cursor.read_i32()?;
    }
    let measurement = MeasurementSettings::from_values(values);

    let board_count = measurement.number_of_boards;
    if !(0..=MAX_BOARDS).contains(&board_count) {
        return Err(PtuError::UnsupportedBoardCount(board_count));
    }
    let mode = AcquisitionMode::from_measurement_mode(measurement.measurement_mode).ok_or_else(|| {
        PtuError::UnsupportedRecordLayout(format!(
            "no known legacy layout for measurement mode {} (PicoHarp 300 T2/T3 only)",
            measurement.measurement_mode
        ))
    })?;
    debug!(boards = board_count, ?mode, acquisition_ms = measurement.acquisition_time_ms, "measurement settings");

    let display = read_display_block(&mut cursor)?;

    let mut boards = Vec::with_capacity(board_count as usize);
    for _ in 0..board_count {
        boards.push(read_board(&mut cursor)?);
    }

    let mut values = [0i32; 9];
    for v in values.iter_mut() {
        *v = cursor.read_i32()?;
    }
    let tttr = TttrSettings::from_values(values);

    let words = usize::try_from(tttr.special_header_words).map_err(|_| {
        PtuError::UnsupportedRecordLayout(format!(
            "negative special header size {}",
            tttr.special_header_words
        ))
    })?;
    cursor.skip(words * 4)?;
    debug!(
        records = tttr.number_of_records,
        special_words = words,
        header_len = cursor.position(),
        "legacy TTTR settings"
    );

    let created = parse_file_time(&text.file_time)?;

    let header = LegacyHeader {
        text,
        measurement,
        display,
        boards,
        tttr,
        mode,
        created,
        header_len: cursor.position(),
    };
    Ok((header, cursor.rest()))
}

/// Parse the creation-time text as a UTC wall-clock time.
pub fn parse_file_time(text: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), FILE_TIME_FORMAT)
        .map_err(|_| PtuError::BadTimestamp(text.to_string()))?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn read_text_block(cursor: &mut ByteCursor<'_>) -> Result<TextHeader> {
    Ok(TextHeader {
        ident: cursor.read_fixed_text(16, "Ident")?,
        format_version: cursor.read_fixed_text(6, "Formatversion")?,
        creator_name: cursor.read_fixed_text(18, "Creatorname")?,
        creator_version: cursor.read_fixed_text(12, "Creatorversion")?,
        file_time: cursor.read_fixed_text(18, "File_CreatingTime")?,
        crlf: cursor.read_fixed_text(2, "CRLF")?,
        comment: cursor.read_fixed_text(256, "Comment")?,
    })
}

fn read_display_block(cursor: &mut ByteCursor<'_>) -> Result<DisplaySettings> {
    let mut display = DisplaySettings::default();
    for curve in display.curves.iter_mut() {
        curve.map_to = cursor.read_i32()?;
        curve.show = cursor.read_i32()?;
    }
    for param in display.params.iter_mut() {
        param.start = cursor.read_f32()?;
        param.step = cursor.read_f32()?;
        param.end = cursor.read_f32()?;
    }
    display.repeat_mode = cursor.read_i32()?;
    display.repeats_per_curve = cursor.read_i32()?;
    display.repeat_time = cursor.read_i32()?;
    display.repeat_wait_time = cursor.read_i32()?;
    display.script_name = cursor.read_fixed_text(20, "Scriptname")?;
    Ok(display)
}

fn read_board(cursor: &mut ByteCursor<'_>) -> Result<BoardRecord> {
    let mut board = BoardRecord {
        hardware_ident: cursor.read_fixed_text(16, "Hardwareident")?,
        hardware_version: cursor.read_fixed_text(8, "Hardwareversion")?,
        hardware_serial: cursor.read_i32()?,
        sync_divider: cursor.read_i32()?,
        cfd_zero_cross0: cursor.read_i32()?,
        cfd_level0: cursor.read_i32()?,
        cfd_zero_cross1: cursor.read_i32()?,
        cfd_level1: cursor.read_i32()?,
        resolution_ns: cursor.read_f32()?,
        router_model_code: cursor.read_i32()?,
        router_enabled: cursor.read_i32()?,
        router_channels: Default::default(),
    };
    for chan in board.router_channels.iter_mut() {
        *chan = RouterChannel {
            input_type: cursor.read_i32()?,
            input_level: cursor.read_i32()?,
            input_edge: cursor.read_i32()?,
            cfd_present: cursor.read_i32()?,
            cfd_level: cursor.read_i32()?,
            cfd_zero_cross: cursor.read_i32()?,
        };
    }
    debug!(ident = %board.hardware_ident, serial = board.hardware_serial, resolution_ns = board.resolution_ns, "board record");
    Ok(board)
}
