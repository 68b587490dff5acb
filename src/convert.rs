// src/convert.rs
use crate::combine::write_combined;
use crate::config::ConvertOptions;
use crate::error::{PtuError, Result};
use crate::legacy::{read_legacy_header, LegacyHeader};
use crate::tags::{encode_tag_stream, HeaderOverrides, PtuFile};
use crate::template::load_template;
use crate::types::TagSequence;
use crate::utils::InputBuffer;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of one conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub legacy: LegacyHeader,
    pub header_len: usize,
    pub payload_len: usize,
    /// Intermediate files left on disk, if requested.
    pub intermediates: Vec<PathBuf>,
}

/// Converts legacy PicoHarp files to `.ptu` against a header template.
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Converter { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `input` using the template at `template`.
    ///
    /// A template ending in `.ptu` is read as a tagged file; anything else
    /// is loaded as a JSON snapshot. A partially written output is removed
    /// when the conversion fails.
    pub fn convert(&self, input: impl AsRef<Path>, template: impl AsRef<Path>) -> Result<ConversionReport> {
        let input = input.as_ref();
        let output = self.options.output_path(input);
        if output == input {
            return Err(PtuError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output would overwrite input {}", input.display()),
            )));
        }

        let template = load_any_template(template.as_ref())?;
        let data = self.open_input(input)?;
        let (legacy, payload) = read_legacy_header(&data)?;

        if let Some(rec_type) = template.record_type() {
            if rec_type != legacy.record_type() {
                warn!(
                    template = ?rec_type,
                    input = ?legacy.record_type(),
                    "template record type differs from the input acquisition mode"
                );
            }
        }

        let overrides = HeaderOverrides::from_legacy(&legacy);
        let header = encode_tag_stream(&template, &overrides)?;

        let mut intermediates = Vec::new();
        if self.options.keep_intermediates {
            let (header_path, payload_path) = intermediate_paths(input);
            fs::write(&header_path, &header)?;
            fs::write(&payload_path, payload)?;
            intermediates.push(header_path);
            intermediates.push(payload_path);
        }

        if let Err(e) = write_output(&output, &header, payload) {
            fs::remove_file(&output).ok();
            return Err(e);
        }

        info!(
            input = %input.display(),
            output = %output.display(),
            records = legacy.tttr.number_of_records,
            payload_bytes = payload.len(),
            "converted"
        );

        Ok(ConversionReport {
            input: input.to_path_buf(),
            output,
            header_len: header.len(),
            payload_len: payload.len(),
            legacy,
            intermediates,
        })
    }

    #[cfg(feature = "mmap")]
    fn open_input(&self, input: &Path) -> Result<InputBuffer> {
        if self.options.mmap {
            InputBuffer::map(input)
        } else {
            InputBuffer::read(input)
        }
    }

    #[cfg(not(feature = "mmap"))]
    fn open_input(&self, input: &Path) -> Result<InputBuffer> {
        if self.options.mmap {
            warn!("mmap requested but the \"mmap\" feature is disabled, reading instead");
        }
        InputBuffer::read(input)
    }
}

/// One-shot conversion with default options. Returns the output path.
pub fn convert_file(input: impl AsRef<Path>, template: impl AsRef<Path>) -> Result<PathBuf> {
    Ok(Converter::new(ConvertOptions::default()).convert(input, template)?.output)
}

/// Load a header template from a `.ptu` file or a JSON snapshot.
pub fn load_any_template(path: &Path) -> Result<TagSequence> {
    let is_ptu = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ptu"));
    let tags = if is_ptu {
        PtuFile::open(path)?.header.tags
    } else {
        load_template(path)?
    };

    if !tags.is_terminated() {
        return Err(PtuError::Snapshot(format!(
            "{} does not end with a single Header_End tag",
            path.display()
        )));
    }
    Ok(tags)
}

fn intermediate_paths(input: &Path) -> (PathBuf, PathBuf) {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    (
        input.with_file_name(format!("{}_header.bin", stem)),
        input.with_file_name(format!("{}_timetags.bin", stem)),
    )
}

fn write_output(path: &Path, header: &[u8], payload: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_combined(&mut writer, header, payload)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intermediate_paths() {
        let (h, p) = intermediate_paths(Path::new("/data/etp032023a_000.pt2"));
        assert_eq!(h, PathBuf::from("/data/etp032023a_000_header.bin"));
        assert_eq!(p, PathBuf::from("/data/etp032023a_000_timetags.bin"));
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let converter = Converter::new(ConvertOptions::default());
        let err = converter.convert("run.ptu", "template.json").unwrap_err();
        assert!(matches!(err, PtuError::Io(ref e) if e.kind() == io::ErrorKind::InvalidInput));
    }
}
