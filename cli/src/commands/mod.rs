//! # Ploy Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! This module aggregates the top-level command groups of the Ploy CLI and
//! makes them reachable from `main.rs`.
//!
//! ## Command Groups
//!
//! - `sites`: Create a site (`new`) and start/stop/restart existing ones
//! - `services`: Global services (MySQL, nginx proxy): lifecycle, status, install, details
//! - `wp`: WP-CLI passthrough into the current site's PHP container
//! - `status`: Host readiness report
//!
//! Each group defines its own Clap arguments and an async `handle_*` function.
//! Handlers load the configuration, build the real collaborators
//! (`SystemRunner`, `SudoFs`, `HttpTemplateSource`), and hand them to the
//! logic underneath, which only sees traits.
//!

/// `ploy services ...`: global services and dependency installers.
pub mod services;
/// `ploy sites ...`: site creation and lifecycle.
pub mod sites;
/// `ploy status`: host readiness report.
pub mod status;
/// `ploy wp ...`: WP-CLI passthrough.
pub mod wp;

/// Path of the running `ploy` executable, used when Ploy invokes itself.
pub(crate) fn ploy_bin() -> String {
    std::env::current_exe()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "ploy".to_string())
}
