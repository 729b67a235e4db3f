//! # Ploy Deploy Log
//!
//! File: cli/src/provision/deploy_log.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! Append-only, human-readable progress log for one site at
//! `<log_dir>/sites/<hostname>/deploy.log`. Lines look like
//! `[2024-05-01 13:37:00] Starting site creation process`.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use chrono::Local;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct DeployLog {
    path: PathBuf,
}

impl DeployLog {
    pub fn for_site(log_dir: &Path, hostname: &str) -> Self {
        Self {
            path: log_dir.join("sites").join(hostname).join("deploy.log"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, message: &str) -> Result<()> {
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        io::append_line(&self.path, &format!("[{}] {}", stamp, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_append_formats_and_accumulates() -> Result<()> {
        let dir = tempdir()?;
        let log = DeployLog::for_site(dir.path(), "blog");
        assert_eq!(log.path(), dir.path().join("sites/blog/deploy.log"));

        log.append("first")?;
        log.append("second")?;
        let content = fs::read_to_string(log.path())?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for (line, msg) in lines.iter().zip(["first", "second"]) {
            // [YYYY-MM-DD HH:MM:SS] msg
            assert_eq!(line.as_bytes()[0], b'[');
            assert_eq!(&line[20..22], "] ");
            assert!(chrono::NaiveDateTime::parse_from_str(&line[1..20], TIMESTAMP_FORMAT).is_ok());
            assert_eq!(&line[22..], msg);
        }
        Ok(())
    }
}
