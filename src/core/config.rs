//! Run configuration
//!
//! Built once from CLI arguments and passed by reference into the walk and the
//! aggregator. Paths not given explicitly follow the tool-directory convention:
//!
//! ```text
//! <root>/                      scan root (parent of the tool directory)
//!   <tool-dir>/
//!     .copycontentignore       ignore patterns
//!     combined_output.txt      output artifact
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::paths::{absolutize, IGNORE_FILE_NAME, OUTPUT_FILE_NAME};

/// How undecodable bytes in a source file are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Drop invalid UTF-8 sequences and keep the rest
    #[default]
    Lossy,
    /// Treat invalid UTF-8 as a read failure for that file
    Strict,
}

impl FromStr for EncodingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lossy" => Ok(EncodingStrategy::Lossy),
            "strict" => Ok(EncodingStrategy::Strict),
            _ => Err(format!("Unknown encoding strategy: {}", s)),
        }
    }
}

/// Path shown in each `File:` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStyle {
    /// Absolute path under the canonicalized scan root
    #[default]
    Absolute,
    /// Forward-slash path relative to the scan root
    Relative,
}

/// Everything one run needs to know
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory that traversal starts from
    pub root: PathBuf,
    /// Pattern file
    pub ignore_file: PathBuf,
    /// Output artifact
    pub output: PathBuf,
    /// Follow symbolic links while walking
    pub follow_links: bool,
    pub encoding: EncodingStrategy,
    /// Files above this size are skipped
    pub max_file_size: Option<u64>,
    pub header_style: HeaderStyle,
}

impl RunConfig {
    /// Convention-derived configuration for a tool directory
    pub fn from_tool_dir(tool_dir: &Path) -> Self {
        let tool_dir = absolutize(tool_dir);
        let root = tool_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| tool_dir.clone());

        Self {
            root,
            ignore_file: tool_dir.join(IGNORE_FILE_NAME),
            output: tool_dir.join(OUTPUT_FILE_NAME),
            follow_links: false,
            encoding: EncodingStrategy::default(),
            max_file_size: None,
            header_style: HeaderStyle::default(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignore_file = path.into();
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Resolve the scan root to an absolute, canonical path
    pub fn canonical_root(&self) -> PathBuf {
        absolutize(&self.root)
    }
}
