//! File reading for the aggregator
//!
//! Provides consistent handling for:
//! - Non-UTF-8 files (invalid sequences dropped, or rejected in strict mode)
//! - Oversized files (optional size limit)
//! - Unreadable files (reported as a `ReadError`, never a panic)

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::config::{EncodingStrategy, RunConfig};
use crate::core::error::{ReadError, ReadErrorKind};

/// Configuration for file reading
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReadConfig {
    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,

    /// Maximum file size to process (bytes)
    pub max_file_size: Option<u64>,
}

impl From<&RunConfig> for FileReadConfig {
    fn from(config: &RunConfig) -> Self {
        Self {
            encoding_strategy: config.encoding,
            max_file_size: config.max_file_size,
        }
    }
}

/// Text read from one file
#[derive(Debug, Clone)]
pub struct FileText {
    pub content: String,

    /// Whether invalid byte sequences were dropped
    pub lossy: bool,
}

/// Read a file as text with the given configuration
pub fn read_text(path: &Path, config: &FileReadConfig) -> Result<FileText, ReadError> {
    let metadata = fs::metadata(path).map_err(|e| ReadError::io(&e))?;
    if metadata.is_dir() {
        return Err(ReadError::new(ReadErrorKind::Io, "Is a directory"));
    }
    // Opening a FIFO would block until a writer shows up
    if !metadata.is_file() {
        return Err(ReadError::new(ReadErrorKind::Io, "Not a regular file"));
    }

    if let Some(limit) = config.max_file_size {
        if metadata.len() > limit {
            return Err(ReadError::new(
                ReadErrorKind::TooLarge,
                format!("File size {} exceeds limit {}", metadata.len(), limit),
            ));
        }
    }

    let mut file = fs::File::open(path).map_err(|e| ReadError::io(&e))?;
    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    file.read_to_end(&mut bytes).map_err(|e| ReadError::io(&e))?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(FileText {
            content,
            lossy: false,
        }),
        Err(e) => match config.encoding_strategy {
            EncodingStrategy::Strict => Err(ReadError::new(
                ReadErrorKind::InvalidUtf8,
                format!(
                    "invalid UTF-8 sequence at byte {}",
                    e.utf8_error().valid_up_to()
                ),
            )),
            EncodingStrategy::Lossy => Ok(FileText {
                content: decode_dropping_invalid(e.as_bytes()),
                lossy: true,
            }),
        },
    }
}

/// Decode UTF-8, silently discarding invalid sequences
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
