//! # Ploy Symbolic Link Management
//!
//! File: cli/src/common/fs/links.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! nginx enables a site through a symlink in `sites-enabled` pointing at the
//! file in `sites-available`. Ploy always removes the old link and creates a
//! fresh one, so the link target is the `sites-available` path the caller
//! passed, verbatim (an absolute path is never rewritten to a relative one).
//!
use crate::common::fs::io::ensure_dir_exists;
use crate::core::error::Result;
use anyhow::{bail, Context};
use std::path::Path;
use tracing::{debug, info};

/// Removes `link` if present (file or link, never a directory).
pub fn remove_file_if_exists(link: &Path) -> Result<()> {
    match link.symlink_metadata() {
        Ok(meta) if meta.is_dir() => {
            bail!("Refusing to remove directory at {:?}", link);
        }
        Ok(_) => {
            std::fs::remove_file(link).with_context(|| format!("Failed to remove {:?}", link))?;
            debug!("Removed {:?}", link);
        }
        Err(_) => debug!("Nothing to remove at {:?}", link),
    }
    Ok(())
}

/// Replaces whatever is at `link` with a symlink pointing at `source`.
///
/// # Errors
///
/// Returns an `Err` if `source` does not exist, the parent of `link` cannot be
/// created, `link` is a directory, or the symlink cannot be created.
pub fn replace_symlink(source: &Path, link: &Path) -> Result<()> {
    if !source.exists() {
        bail!("Symlink source path does not exist: {:?}", source);
    }
    if let Some(parent) = link.parent() {
        ensure_dir_exists(parent)
            .with_context(|| format!("Failed to create parent directory for link {:?}", link))?;
    }
    remove_file_if_exists(link)?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, link).with_context(|| {
            format!("Failed to create symlink from {:?} to {:?}", link, source)
        })?;
    }
    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(source, link).with_context(|| {
            format!("Failed to create symlink from {:?} to {:?}", link, source)
        })?;
    }
    info!("Created symlink: {:?} -> {:?}", link, source);
    Ok(())
}
