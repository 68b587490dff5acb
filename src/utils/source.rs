// src/utils/source.rs
use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Whole-file input buffer, either read into memory or memory-mapped.
pub enum InputBuffer {
    Owned(Vec<u8>),
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
}

impl InputBuffer {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::with_capacity(file.metadata().map(|m| m.len() as usize).unwrap_or(0));
        file.read_to_end(&mut bytes)?;
        Ok(InputBuffer::Owned(bytes))
    }

    /// Map the file instead of reading it (requires the "mmap" feature).
    #[cfg(feature = "mmap")]
    pub fn map(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(InputBuffer::Mapped(mmap))
    }
}

impl Deref for InputBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            InputBuffer::Owned(v) => v,
            #[cfg(feature = "mmap")]
            InputBuffer::Mapped(m) => m,
        }
    }
}
