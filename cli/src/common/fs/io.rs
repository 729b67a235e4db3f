//! # Ploy Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that add context to errors and create
//! parent directories on demand. Used for the generated compose files, the
//! staging copies of nginx configs, and the per-site deploy log.
//!
//! - **`ensure_dir_exists`**: `mkdir -p`, failing if the path exists as a non-directory.
//! - **`read_file_to_string`**: `fs::read_to_string` with the path in the error.
//! - **`write_string_to_file`**: Writes (overwrites) a file after ensuring its parent exists.
//! - **`append_line`**: Appends one line to a file, creating it and its parent if needed.
//! - **`remove_file_if_exists`**: `rm -f` for a single file.
//!
use crate::core::error::{PloyError, Result};
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating it fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(PloyError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes string content to a file, overwriting it, after ensuring the parent directory exists.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Appends `line` plus a newline to `path`.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?} for appending", path))?;
    writeln!(file, "{}", line).with_context(|| format!("Failed to append to file {:?}", path))?;
    Ok(())
}

/// Removes `path` if it exists. Returns whether a file was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed file: {:?}", path);
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file {:?}", path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("sites/host.example.com");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&new_dir)?;
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_read_write_string_to_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("nested/compose.yml");
        write_string_to_file(&file_path, "services: {}")?;
        assert_eq!(read_file_to_string(&file_path)?, "services: {}");
        write_string_to_file(&file_path, "replaced")?;
        assert_eq!(read_file_to_string(&file_path)?, "replaced");
        Ok(())
    }

    #[test]
    fn test_read_file_not_found() -> Result<()> {
        let base_dir = tempdir()?;
        assert!(read_file_to_string(&base_dir.path().join("missing.txt")).is_err());
        Ok(())
    }

    #[test]
    fn test_append_line_accumulates() -> Result<()> {
        let base_dir = tempdir()?;
        let log = base_dir.path().join("logs/deploy.log");
        append_line(&log, "first")?;
        append_line(&log, "second")?;
        assert_eq!(read_file_to_string(&log)?, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn test_remove_file_if_exists() -> Result<()> {
        let base_dir = tempdir()?;
        let file = base_dir.path().join("stale.yml");
        write_string_to_file(&file, "x")?;
        assert!(remove_file_if_exists(&file)?);
        assert!(!file.exists());
        assert!(!remove_file_if_exists(&file)?);
        Ok(())
    }
}
