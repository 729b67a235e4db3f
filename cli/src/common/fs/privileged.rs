//! # Ploy Privileged Filesystem Operations
//!
//! File: cli/src/common/fs/privileged.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Installing an nginx site, installing packages, and reloading system
//! services all need root. Ploy never holds a privileged session: each
//! operation is an isolated one-shot call behind the `PrivilegedFs` trait.
//!
//! ## Implementations
//!
//! - **`SudoFs`**: Runs every operation as `sudo <cmd>` through a `CommandRunner`
//!   (`sudo mkdir -p`, `sudo mv`, `sudo chown`, `sudo chmod`, `sudo rm -f`,
//!   `sudo ln -s`). This is the default on servers.
//! - **`DirectFs`**: Performs the same operations in-process with `std::fs`.
//!   Used when Ploy already runs as root (`[privilege] use_sudo = false`) and
//!   by tests, which point the nginx root at a temporary directory.
//!
use crate::common::fs::{io, links};
use crate::common::process::CommandRunner;
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, info};

/// Operations that require elevated privileges on a real server.
pub trait PrivilegedFs {
    /// `mkdir -p` for every directory.
    fn create_dirs(&self, dirs: &[&Path]) -> Result<()>;

    /// Moves a staged file into place, then fixes ownership and mode.
    fn install_file(&self, staged: &Path, dest: &Path, owner: &str, mode: &str) -> Result<()>;

    /// `rm -f`.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// `ln -s target link`. The link must not exist.
    fn symlink(&self, target: &Path, link: &Path) -> Result<()>;

    /// Runs an arbitrary command with elevated privileges, streaming its output.
    fn run(&self, program: &str, args: &[&str]) -> Result<()>;
}

/// `SudoFs` unless `[privilege] use_sudo = false`.
pub fn from_config<'a>(config: &Config, runner: &'a dyn CommandRunner) -> Box<dyn PrivilegedFs + 'a> {
    if config.privilege.use_sudo {
        Box::new(SudoFs::new(runner))
    } else {
        debug!("Privileged operations run in-process");
        Box::new(DirectFs::new(runner))
    }
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Runs privileged operations through `sudo`.
pub struct SudoFs<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> SudoFs<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    fn sudo(&self, args: &[&str]) -> Result<()> {
        self.runner.output("sudo", args)?.into_result("sudo", args)?;
        Ok(())
    }
}

impl PrivilegedFs for SudoFs<'_> {
    fn create_dirs(&self, dirs: &[&Path]) -> Result<()> {
        let owned: Vec<String> = dirs.iter().map(|d| lossy(d)).collect();
        let mut args = vec!["mkdir", "-p"];
        args.extend(owned.iter().map(String::as_str));
        self.sudo(&args)
    }

    fn install_file(&self, staged: &Path, dest: &Path, owner: &str, mode: &str) -> Result<()> {
        let (staged, dest) = (lossy(staged), lossy(dest));
        self.sudo(&["mv", &staged, &dest])?;
        self.sudo(&["chown", owner, &dest])?;
        self.sudo(&["chmod", mode, &dest])
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.sudo(&["rm", "-f", &lossy(path)])
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        self.sudo(&["ln", "-s", &lossy(target), &lossy(link)])
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let mut full = vec![program];
        full.extend_from_slice(args);
        self.runner.stream("sudo", &full)
    }
}

/// Performs privileged operations in-process, for root sessions and tests.
pub struct DirectFs<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> DirectFs<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

impl PrivilegedFs for DirectFs<'_> {
    fn create_dirs(&self, dirs: &[&Path]) -> Result<()> {
        for dir in dirs {
            io::ensure_dir_exists(dir)?;
        }
        Ok(())
    }

    fn install_file(&self, staged: &Path, dest: &Path, owner: &str, mode: &str) -> Result<()> {
        if std::fs::rename(staged, dest).is_err() {
            // Cross-device moves cannot rename.
            std::fs::copy(staged, dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", staged, dest))?;
            std::fs::remove_file(staged)
                .with_context(|| format!("Failed to remove staged file {:?}", staged))?;
        }
        debug!("Ownership '{}' left unchanged for {:?}", owner, dest);
        set_mode(dest, mode)?;
        info!("Installed {:?}", dest);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        links::remove_file_if_exists(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        links::replace_symlink(target, link)
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        self.runner.stream(program, args)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: &str) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let bits = u32::from_str_radix(mode, 8)
        .with_context(|| format!("Invalid octal mode '{}'", mode))?;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(bits))
        .with_context(|| format!("Failed to chmod {} {:?}", mode, path))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: &str) -> Result<()> {
    Ok(())
}
