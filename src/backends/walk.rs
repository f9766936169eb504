//! Traversal-and-filter engine
//!
//! Walks the scan root depth-first with walkdir. Inside each directory, files
//! come before subdirectories and both are sorted by name, so the order is
//! stable for a fixed tree. Excluded directories are pruned before descent.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::config::RunConfig;
use crate::core::error::CopyError;
use crate::core::paths::{absolutize, make_relative, normalize_path};
use crate::core::patterns::IgnoreRules;

/// A file selected for aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path
    pub path: PathBuf,
    /// Forward-slash path relative to the scan root
    pub relative: String,
}

/// Collect every included file under the configured root, in traversal order
pub fn collect_files(
    config: &RunConfig,
    rules: &IgnoreRules,
) -> Result<Vec<FileEntry>, CopyError> {
    let root = config.canonical_root();
    if !root.is_dir() {
        return Err(CopyError::InvalidRoot(config.root.clone()));
    }

    let output = absolutize(&config.output);
    info!("Starting to process files in directory: {}", root.display());

    let walker = WalkDir::new(&root)
        .follow_links(config.follow_links)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|entry| keep_entry(entry, rules, &root));

    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().is_dir() {
            debug!("Walking through directory: {}", path.display());
            continue;
        }

        // Unfollowed links are read through only when they point at a regular file.
        // FIFOs, sockets and devices are never opened: a pipe blocks on open.
        let regular = if entry.file_type().is_symlink() {
            path.is_file()
        } else {
            entry.file_type().is_file()
        };
        if !regular {
            debug!("Skipping non-regular entry: {}", path.display());
            continue;
        }

        if path == output {
            debug!("Skipping output file: {}", path.display());
            continue;
        }

        let relative = make_relative(path, &root).unwrap_or_else(|| normalize_path(path));
        files.push(FileEntry {
            path: path.to_path_buf(),
            relative,
        });
    }

    Ok(files)
}

/// Root is always kept; everything else goes through the ignore rules
fn keep_entry(entry: &DirEntry, rules: &IgnoreRules, root: &Path) -> bool {
    entry.depth() == 0 || !rules.should_ignore(entry.path(), entry.file_type().is_dir(), root)
}

/// Log the selected files before any of them is read
pub fn report_files(files: &[FileEntry]) {
    info!("List of files to be read:");
    for file in files {
        info!("{}", file.path.display());
    }
}

/// Run the list command (dry run: print the selection, write nothing)
pub fn run_list(config: &RunConfig) -> anyhow::Result<()> {
    let rules = IgnoreRules::load(&config.ignore_file);
    let files = collect_files(config, &rules)?;

    for file in &files {
        println!("{}", file.relative);
    }
    info!("{} files would be included", files.len());

    Ok(())
}
