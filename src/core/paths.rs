//! Path normalization utilities
//!
//! Relative paths are always reported with '/' as separator, whatever the host uses.

use std::path::{Path, PathBuf};

/// Conventional name of the ignore-pattern file inside the tool directory
pub const IGNORE_FILE_NAME: &str = ".copycontentignore";

/// Conventional name of the output artifact inside the tool directory
pub const OUTPUT_FILE_NAME: &str = "combined_output.txt";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Replace every backslash with a forward slash
pub fn normalize_separators(s: &str) -> String {
    s.replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Canonicalize a path. A file that does not exist yet resolves through its
/// parent directory; failing that the path is only made absolute.
pub fn absolutize(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(p) = parent.canonicalize() {
            return p.join(name);
        }
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
