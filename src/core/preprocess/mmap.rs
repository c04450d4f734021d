//! Memory-mapped file I/O for image reads.
//!
//! Files of 1MB and above are mapped instead of copied into a buffer.
//! LFW images are small, so most reads take the plain `fs::read` path.

use crate::error::PreprocessError;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Minimum file size to use memory-mapped I/O (1MB)
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Read file bytes, mapping large files into memory.
pub fn read_file_bytes(path: &Path) -> Result<FileBytes, PreprocessError> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;

    if metadata.len() >= MMAP_THRESHOLD {
        read_mmap(path)
    } else {
        read_standard(path)
    }
}

fn read_mmap(path: &Path) -> Result<FileBytes, PreprocessError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;

    // SAFETY: the mapping is read-only and the file handle outlives it.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| io_error(path, e))?;

    Ok(FileBytes::Mmap(mmap))
}

fn read_standard(path: &Path) -> Result<FileBytes, PreprocessError> {
    let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;
    Ok(FileBytes::Vec(bytes))
}

fn io_error(path: &Path, source: std::io::Error) -> PreprocessError {
    PreprocessError::IoError {
        path: path.to_path_buf(),
        source,
    }
}

/// File bytes that may be either owned or memory-mapped.
pub enum FileBytes {
    Vec(Vec<u8>),
    Mmap(Mmap),
}

impl AsRef<[u8]> for FileBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            FileBytes::Vec(v) => v,
            FileBytes::Mmap(m) => m,
        }
    }
}

impl std::ops::Deref for FileBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_ref()
    }
}

/// Magic byte check to reject non-images before a full decode.
pub fn validate_image_header(bytes: &[u8]) -> bool {
    if bytes.len() < 8 {
        return false;
    }

    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return true;
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return true;
    }

    // BMP: 42 4D
    if bytes.starts_with(b"BM") {
        return true;
    }

    false
}
