//! # Ploy Global Services Lifecycle
//!
//! File: cli/src/commands/services/lifecycle.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! `ploy services start|stop|restart` drive `<services_dir>/docker-compose.yml`.
//! Start and restart finish with `docker compose ps`; a failing `ps` is only
//! a warning.
//!
use crate::common::docker::compose::run_compose;
use crate::common::process::{CommandRunner, SystemRunner};
use crate::common::ui;
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Start,
    Stop,
    Restart,
}

fn show_ps(runner: &dyn CommandRunner, compose_file: &Path) {
    if let Err(e) = run_compose(runner, compose_file, &["ps"]) {
        ui::warning(&format!("Error checking status of global services: {:#}", e));
    }
}

pub fn run_global(runner: &dyn CommandRunner, compose_file: &Path, action: GlobalAction) -> Result<()> {
    match action {
        GlobalAction::Start => {
            println!("Starting global services...");
            run_compose(runner, compose_file, &["up", "-d"])
                .context("Error starting global services")?;
            show_ps(runner, compose_file);
            ui::success("Global services started successfully");
        }
        GlobalAction::Stop => {
            println!("Stopping global services...");
            run_compose(runner, compose_file, &["down"])
                .context("Error stopping global services")?;
            ui::success("Global services stopped successfully");
        }
        GlobalAction::Restart => {
            println!("Restarting global services...");
            run_compose(runner, compose_file, &["down"])
                .context("Error stopping global services")?;
            run_compose(runner, compose_file, &["up", "-d"])
                .context("Error starting global services")?;
            show_ps(runner, compose_file);
            ui::success("Global services restarted successfully");
        }
    }
    Ok(())
}

pub fn handle_global(action: GlobalAction) -> Result<()> {
    info!("Handling services {:?}", action);
    let config = config::load_config()?;
    run_global(&SystemRunner, &config.global_compose(), action)
}
