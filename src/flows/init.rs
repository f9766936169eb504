//! Starter ignore file

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::core::error::CopyError;
use crate::core::patterns::RESERVED_DIR;

/// Patterns written by `init`
pub fn starter_template() -> String {
    format!(
        "# Patterns are relative to the scan root.\n\
# A pattern naming a directory excludes everything under it (\"build\" covers\n\
# \"build/out\" but not \"build-tools\"). Any other pattern must match a path exactly.\n\
# {RESERVED_DIR} is always excluded.\n\
\n\
# Version control\n\
.git/\n\
\n\
# Build output\n\
target/\n\
dist/\n\
build/\n\
.next/\n\
\n\
# Lock files\n\
package-lock.json\n\
yarn.lock\n\
Cargo.lock\n\
\n\
# Local secrets\n\
.env\n"
    )
}

/// Write the starter template, refusing to overwrite unless `force`
pub fn write_starter(path: &Path, force: bool) -> Result<(), CopyError> {
    if path.exists() && !force {
        return Err(CopyError::IgnoreFileExists(path.to_path_buf()));
    }

    let write_err = |source| CopyError::IgnoreFileWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, starter_template()).map_err(write_err)
}

/// Run the init command
pub fn run_init(path: &Path, force: bool) -> Result<()> {
    write_starter(path, force)?;
    info!("Wrote ignore file: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patterns::IgnoreRules;
    use tempfile::tempdir;

    #[test]
    fn test_template_parses() {
        let rules = IgnoreRules::parse(&starter_template());
        let names: Vec<_> = rules.patterns().iter().map(|p| p.as_str()).collect();
        assert!(names.contains(&".git"));
        assert!(names.contains(&"target"));
        assert!(names.contains(&".env"));
        assert!(!names.iter().any(|n| n.starts_with('#')));
    }

    #[test]
    fn test_write_starter_creates_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tool").join(".copycontentignore");

        write_starter(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), starter_template());
    }

    #[test]
    fn test_write_starter_refuses_overwrite() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(".copycontentignore");
        fs::write(&path, "mine\n").unwrap();

        let err = write_starter(&path, false).unwrap_err();
        assert!(matches!(err, CopyError::IgnoreFileExists(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "mine\n");

        write_starter(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), starter_template());
    }
}
