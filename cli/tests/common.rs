//! # Ploy CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test gets
//! its own temporary root holding a `config.toml` whose paths (sites, logs,
//! nginx, scratch) all live under that root, with sudo disabled and
//! `PLOY_TEST_ENV` set, so nothing outside the temp dir is touched.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn ploy_cmd() -> Command {
    Command::cargo_bin("ploy").expect("Failed to find ploy binary for testing")
}

/// A temporary Ploy installation.
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let p = |name: &str| root.path().join(name).to_string_lossy().into_owned();
        let config = format!(
            "[paths]\n\
             services_dir = '{}'\n\
             sites_dir = '{}'\n\
             log_dir = '{}'\n\
             nginx_dir = '{}'\n\
             scratch_dir = '{}'\n\
             \n\
             [privilege]\n\
             use_sudo = false\n",
            p("services"),
            p("sites"),
            p("logs"),
            p("nginx"),
            p("scratch"),
        );
        fs::write(root.path().join("config.toml"), config).expect("Failed to write config");
        Self { root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let dir = self.path(rel);
        fs::create_dir_all(&dir).expect("Failed to create dir");
        dir
    }

    /// `ploy` configured for this environment, in test mode.
    pub fn cmd(&self) -> Command {
        let mut cmd = ploy_cmd();
        cmd.env("PLOY_CONFIG", self.root.path().join("config.toml"))
            .env("PLOY_TEST_ENV", "1")
            .env_remove("PLOY_WEBHOOK")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }
}
