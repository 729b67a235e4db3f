//! # Ploy Docker Compose Helpers
//!
//! File: cli/src/common/docker/compose.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Ploy drives Docker exclusively through the `docker compose` CLI. This
//! module builds the argument lists, locates compose files on disk, and reads
//! just enough of a compose file to know which service runs PHP.
//!
//! - **`compose_args`**: `compose -f <file> <args...>`, inserting `-T` after
//!   `exec` when stdout is not a terminal (otherwise compose refuses to run).
//! - **`run_compose`**: Streams `docker compose ...` through a `CommandRunner`.
//! - **`compose_file_in`** / **`find_compose_file`**: Locate `docker-compose*.yml`
//!   in one directory or by walking up from the current directory.
//! - **`detect_app_service`**: Picks `php`, then `litespeed`, from the file's services.
//!
use crate::common::fs::io;
use crate::common::process::CommandRunner;
use crate::core::error::Result;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Service names that can host WP-CLI, in order of preference.
const APP_SERVICES: [&str; 2] = ["php", "litespeed"];

#[derive(Deserialize, Debug)]
struct ComposeServices {
    #[serde(default)]
    services: BTreeMap<String, serde_yaml::Value>,
}

/// Builds the argument list for `docker` (without the program name).
pub fn compose_args(compose_path: &Path, args: &[&str], interactive: bool) -> Vec<String> {
    let mut full = vec![
        "compose".to_string(),
        "-f".to_string(),
        compose_path.to_string_lossy().into_owned(),
    ];
    match args.split_first() {
        Some((&"exec", rest)) if !interactive => {
            full.push("exec".to_string());
            full.push("-T".to_string());
            full.extend(rest.iter().map(|a| a.to_string()));
        }
        _ => full.extend(args.iter().map(|a| a.to_string())),
    }
    full
}

/// Runs `docker compose -f <file> <args...>` with inherited stdio.
pub fn run_compose(runner: &dyn CommandRunner, compose_path: &Path, args: &[&str]) -> Result<()> {
    let full = compose_args(compose_path, args, std::io::stdout().is_terminal());
    let borrowed: Vec<&str> = full.iter().map(String::as_str).collect();
    runner.stream("docker", &borrowed)
}

/// Every `docker-compose*.yml` file directly inside `dir`, in name order.
pub fn compose_files_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path.file_name().and_then(|n| n.to_str()).is_some_and(|name| {
                    name.starts_with("docker-compose") && name.ends_with(".yml")
                })
        })
        .collect();
    found.sort();
    found
}

/// Returns the compose file inside `dir`: `docker-compose.yml` if present, otherwise the
/// first `docker-compose*.yml` in name order.
pub fn compose_file_in(dir: &Path) -> Option<PathBuf> {
    let plain = dir.join("docker-compose.yml");
    if plain.is_file() {
        return Some(plain);
    }
    compose_files_in(dir).into_iter().next()
}

/// Walks from `start` up through its ancestors looking for a compose file.
/// The search stops after checking `stop_at` (usually the home directory).
pub fn find_compose_file(start: &Path, stop_at: Option<&Path>) -> Option<PathBuf> {
    for dir in start.ancestors() {
        if let Some(found) = compose_file_in(dir) {
            debug!("Found compose file {:?}", found);
            return Some(found);
        }
        if stop_at.is_some_and(|stop| stop == dir) {
            break;
        }
    }
    None
}

/// Names the service WP-CLI should run in.
pub fn detect_app_service(compose_path: &Path) -> Result<String> {
    let content = io::read_file_to_string(compose_path)?;
    let parsed: ComposeServices = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse compose file {:?}", compose_path))?;
    for candidate in APP_SERVICES {
        if parsed.services.contains_key(candidate) {
            return Ok(candidate.to_string());
        }
    }
    bail!(
        "No suitable container found in {:?} (expected one of: {})",
        compose_path,
        APP_SERVICES.join(", ")
    )
}
