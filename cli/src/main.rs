//! # Ploy Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Ploy CLI, which provisions
//! and manages WordPress sites on a single server using Docker Compose and a
//! host nginx reverse proxy. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//! - Printing errors and exiting non-zero on any failure
//!
//! ## Architecture
//!
//! - `commands`: Clap argument structs and `handle_*` functions per command group
//! - `provision`: The site-provisioning workflow behind `ploy sites new`
//! - `common`: Process, filesystem, Docker, HTTP, and terminal helpers
//! - `core`: Configuration, errors, and templating
//!
//! ## Examples
//!
//! ```bash
//! ploy --help
//! ploy -vv sites new --hostname blog --domain blog.example.com
//! PLOY_TEST_ENV=1 ploy sites new --non-interactive --hostname demo
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;
mod provision;

#[derive(Parser, Debug)]
#[command(
    name = "ploy",
    about = "Ploy: WordPress site provisioning on Docker Compose and nginx",
    long_about = "Create, start, and stop WordPress sites on a single server.\n\
                  Manages the shared MySQL service and the host nginx reverse proxy.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Manage sites (new, start, stop, restart).
    Sites(commands::sites::SitesArgs),
    /// Manage global services (MySQL, nginx proxy).
    Services(commands::services::ServicesArgs),
    /// Run WP-CLI in the current site's PHP container.
    Wp(commands::wp::WpArgs),
    /// Show host readiness.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Sites(args) => commands::sites::handle_sites(args).await,
        Commands::Services(args) => commands::services::handle_services(args).await,
        Commands::Wp(args) => commands::wp::handle_wp(args).await,
        Commands::Status => commands::status::handle_status().await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        common::ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
