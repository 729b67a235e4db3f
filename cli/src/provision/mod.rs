//! # Ploy Site Provisioning (`provision`)
//!
//! File: cli/src/provision/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! The workflow behind `ploy sites new`, leaves first:
//!
//! - **`site`**: `SiteRequest` / `Site` and the naming rules for their files.
//! - **`validate`**: Pure parameter checks.
//! - **`proxy`**: nginx virtual-host generation and enablement.
//! - **`bootstrap`**: Probe-then-install for dependency services.
//! - **`deploy_log`**: The per-site, timestamped progress log.
//! - **`launcher`**: Sequences all of the above (`launch_site`).
//!

pub mod bootstrap;
pub mod deploy_log;
pub mod launcher;
pub mod proxy;
pub mod site;
pub mod validate;
