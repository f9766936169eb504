//! Ignore patterns
//!
//! A pattern file holds one pattern per line. Blank lines and `#` comments are
//! skipped. Patterns are relative to the scan root and match in two ways:
//! - a directory is excluded when its relative path equals the pattern or lies
//!   below it (`build` covers `build/output`, not `build-tools`)
//! - any entry is excluded when its relative path equals the pattern exactly
//!
//! Any path with a `node_modules` segment is always excluded.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, warn};

use crate::core::paths::{make_relative, normalize_separators};

/// Dependency directory excluded regardless of user patterns
pub const RESERVED_DIR: &str = "node_modules";

/// A single normalized pattern (forward slashes, no trailing slash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern(String);

impl IgnorePattern {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize_separators(raw.trim());
        Self(normalized.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `rel` equals the pattern or is nested under it
    fn covers(&self, rel: &str) -> bool {
        match rel.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Why an entry was excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion<'a> {
    Reserved,
    Directory(&'a IgnorePattern),
    Exact(&'a IgnorePattern),
}

/// The ordered set of patterns for one run
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreRules {
    /// Load patterns from a file.
    ///
    /// A missing or unreadable file is logged and yields an empty rule set.
    pub fn load(path: &Path) -> Self {
        debug!("Reading ignore file: {}", path.display());

        match fs::read(path) {
            Ok(bytes) => {
                let rules = Self::parse(&String::from_utf8_lossy(&bytes));
                for pattern in rules.patterns() {
                    debug!("Ignoring pattern: {}", pattern.as_str());
                }
                debug!("Loaded {} ignore patterns", rules.len());
                rules
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Ignore file not found: {}", path.display());
                Self::default()
            }
            Err(e) => {
                error!("Cannot read ignore file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse pattern-file text, preserving line order
    pub fn parse(text: &str) -> Self {
        let patterns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(IgnorePattern::new)
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[IgnorePattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Decide whether `path` (under `root`) is excluded.
    ///
    /// Paths outside `root` are never excluded by user patterns.
    pub fn should_ignore(&self, path: &Path, is_dir: bool, root: &Path) -> bool {
        let relative = match make_relative(path, root) {
            Some(r) => r,
            None => return false,
        };

        match self.exclusion(&relative, is_dir) {
            Some(Exclusion::Reserved) => {
                debug!("Skipping {} directory: {}", RESERVED_DIR, relative);
                true
            }
            Some(Exclusion::Directory(p)) => {
                debug!(
                    "Skipping ignored directory: {} (matched pattern: {})",
                    relative,
                    p.as_str()
                );
                true
            }
            Some(Exclusion::Exact(p)) => {
                debug!(
                    "Skipping ignored file: {} (matched pattern: {})",
                    relative,
                    p.as_str()
                );
                true
            }
            None => false,
        }
    }

    /// Match a root-relative, forward-slash path against the rules
    pub fn exclusion(&self, relative: &str, is_dir: bool) -> Option<Exclusion<'_>> {
        if relative.split('/').any(|segment| segment == RESERVED_DIR) {
            return Some(Exclusion::Reserved);
        }

        for pattern in &self.patterns {
            if is_dir && pattern.covers(relative) {
                return Some(Exclusion::Directory(pattern));
            } else if relative == pattern.as_str() {
                return Some(Exclusion::Exact(pattern));
            }
        }

        None
    }
}
