//! # Ploy Services Command Group
//!
//! File: cli/src/commands/services/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Entry point and router for `ploy services`. "Services" are the shared
//! dependencies every site relies on: the MySQL container (and friends in the
//! global compose file) and the host nginx acting as reverse proxy.
//!
//! `status` and `install` double as the probe and installer used by
//! `ploy sites new` (see `provision::bootstrap`), which calls this same
//! binary for them.
//!
//! ## Examples
//!
//! ```bash
//! ploy services start
//! ploy services status mysql
//! ploy services install mysql --user wp --password s3cret --port 3307
//! ploy services install nginx-proxy
//! ploy services details mysql --json
//! ```
//!
use crate::core::error::Result;
use clap::{Parser, Subcommand, ValueEnum};

/// `ploy services details`.
mod details;
/// `ploy services install mysql|nginx-proxy`.
mod install;
/// `ploy services start|stop|restart` for the global compose file.
mod lifecycle;
/// `ploy services status`.
mod status;

/// Services that can be probed and installed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceName {
    Mysql,
    NginxProxy,
}

impl ServiceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Mysql => "mysql",
            ServiceName::NginxProxy => "nginx-proxy",
        }
    }
}

#[derive(Parser, Debug)]
pub struct ServicesArgs {
    #[command(subcommand)]
    command: ServicesCommand,
}

#[derive(Subcommand, Debug)]
enum ServicesCommand {
    /// Start global services (`docker compose up -d`).
    Start,
    /// Stop global services (`docker compose down`).
    Stop,
    /// Restart global services.
    Restart,
    /// Print `<service> is running` or `<service> is not running`.
    Status(status::StatusArgs),
    /// Install a service.
    Install(install::InstallArgs),
    /// Show connection details for a service.
    Details(details::DetailsArgs),
}

pub async fn handle_services(args: ServicesArgs) -> Result<()> {
    match args.command {
        ServicesCommand::Start => lifecycle::handle_global(lifecycle::GlobalAction::Start)?,
        ServicesCommand::Stop => lifecycle::handle_global(lifecycle::GlobalAction::Stop)?,
        ServicesCommand::Restart => lifecycle::handle_global(lifecycle::GlobalAction::Restart)?,
        ServicesCommand::Status(args) => status::handle_status(args)?,
        ServicesCommand::Install(args) => install::handle_install(args).await?,
        ServicesCommand::Details(args) => details::handle_details(args)?,
    }
    Ok(())
}
