// src/config.rs
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Conversion settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConvertOptions {
    /// Extension given to the output when no explicit output path is set.
    pub output_extension: String,
    /// Explicit output path; overrides `output_extension`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Also write `<stem>_header.bin` and `<stem>_timetags.bin` next to the input.
    pub keep_intermediates: bool,
    /// Memory-map the input instead of reading it (needs the "mmap" feature).
    pub mmap: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            output_extension: "ptu".to_string(),
            output: None,
            keep_intermediates: false,
            mmap: false,
        }
    }
}

impl ConvertOptions {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn output_path(&self, input: &Path) -> PathBuf {
        match &self.output {
            Some(p) => p.clone(),
            None => input.with_extension(&self.output_extension),
        }
    }
}
