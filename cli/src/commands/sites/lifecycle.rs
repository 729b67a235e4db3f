//! # Ploy Sites Lifecycle Handler
//!
//! File: cli/src/commands/sites/lifecycle.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Implements `ploy sites start|stop|restart [hostname]`.
//!
//! Every non-hidden directory directly under the sites dir that contains a
//! compose file is a site. For each one (or only `hostname`, if given) the
//! matching `docker compose` command runs. A site whose command fails is
//! reported and skipped so the remaining sites are still handled.
//!
use crate::common::docker::compose;
use crate::common::process::{CommandRunner, SystemRunner};
use crate::common::ui;
use crate::core::config;
use crate::core::error::{PloyError, Result};
use anyhow::anyhow;
use clap::Parser;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
pub struct LifecycleArgs {
    /// Only act on this site.
    hostname: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteAction {
    Start,
    Stop,
    Restart,
}

impl SiteAction {
    fn compose_args(&self) -> &'static [&'static str] {
        match self {
            SiteAction::Start => &["up", "-d"],
            SiteAction::Stop => &["down"],
            SiteAction::Restart => &["restart"],
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            SiteAction::Start => "start",
            SiteAction::Stop => "stop",
            SiteAction::Restart => "restart",
        }
    }

    fn progressive(&self) -> &'static str {
        match self {
            SiteAction::Start => "Starting",
            SiteAction::Stop => "Stopping",
            SiteAction::Restart => "Restarting",
        }
    }
}

/// Runs `action` for each matching site. Returns how many sites succeeded.
pub fn run_for_sites(
    runner: &dyn CommandRunner,
    sites_dir: &Path,
    only: Option<&str>,
    action: SiteAction,
) -> Result<usize> {
    if !sites_dir.is_dir() {
        return Err(anyhow!(PloyError::FileSystem(format!(
            "Sites directory {:?} does not exist",
            sites_dir
        ))));
    }

    let mut handled = 0;
    for entry in WalkDir::new(sites_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", sites_dir, e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || only.is_some_and(|h| h != name) {
            continue;
        }
        let Some(compose_file) = compose::compose_file_in(entry.path()) else {
            debug!("No compose file in {:?}", entry.path());
            continue;
        };

        println!("{} site {}", action.progressive(), name);
        match compose::run_compose(runner, &compose_file, action.compose_args()) {
            Ok(()) => handled += 1,
            Err(e) => ui::warning(&format!("Failed to {} {}: {:#}", action.verb(), name, e)),
        }
    }
    Ok(handled)
}

pub fn handle_lifecycle(args: LifecycleArgs, action: SiteAction) -> Result<()> {
    info!("Handling sites {} (hostname: {:?})", action.verb(), args.hostname);
    let config = config::load_config()?;
    let handled = run_for_sites(&SystemRunner, &config.sites_dir(), args.hostname.as_deref(), action)?;
    if handled == 0 {
        println!("No sites found to {}.", action.verb());
    }
    Ok(())
}
