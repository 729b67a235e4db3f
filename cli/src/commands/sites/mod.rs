//! # Ploy Sites Command Group
//!
//! File: cli/src/commands/sites/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Entry point and router for `ploy sites`. A site is a directory under the
//! configured sites dir holding a `docker-compose*.yml`.
//!
//! ## Examples
//!
//! ```bash
//! # Create a site, prompting for anything missing
//! ploy sites new --hostname blog --domain blog.example.com
//!
//! # Fully scripted
//! ploy sites new --non-interactive --hostname shop --type wp --db-source internal \
//!     --scaling-type dynamic --replicas 2 --max-replicas 6 --webhook https://hooks.example.com/ploy
//!
//! # Lifecycle, for every site or one of them
//! ploy sites start
//! ploy sites restart blog
//! ```
//!
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Implements `ploy sites start|stop|restart`.
mod lifecycle;
/// Implements `ploy sites new`.
mod new;

#[derive(Parser, Debug)]
pub struct SitesArgs {
    #[command(subcommand)]
    command: SitesCommand,
}

#[derive(Subcommand, Debug)]
enum SitesCommand {
    /// Launch a new site.
    New(new::NewArgs),
    /// Start all sites, or one by hostname.
    Start(lifecycle::LifecycleArgs),
    /// Stop all sites, or one by hostname.
    Stop(lifecycle::LifecycleArgs),
    /// Restart all sites, or one by hostname.
    Restart(lifecycle::LifecycleArgs),
}

pub async fn handle_sites(args: SitesArgs) -> Result<()> {
    match args.command {
        SitesCommand::New(args) => new::handle_new(args).await?,
        SitesCommand::Start(args) => lifecycle::handle_lifecycle(args, lifecycle::SiteAction::Start)?,
        SitesCommand::Stop(args) => lifecycle::handle_lifecycle(args, lifecycle::SiteAction::Stop)?,
        SitesCommand::Restart(args) => {
            lifecycle::handle_lifecycle(args, lifecycle::SiteAction::Restart)?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_sites_new() {
        let result = SitesArgs::try_parse_from(["sites", "new", "--hostname", "blog"]);
        assert!(result.is_ok(), "Failed to parse 'sites new': {:?}", result.err());
    }

    #[test]
    fn test_parses_sites_restart_with_hostname() {
        let args = SitesArgs::try_parse_from(["sites", "restart", "blog"]).unwrap();
        assert!(matches!(args.command, SitesCommand::Restart(_)));
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(SitesArgs::try_parse_from(["sites", "delete"]).is_err());
    }
}
