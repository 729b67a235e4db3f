//! # Ploy Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Shared building blocks used by the provisioning workflow and the command
//! handlers. Nothing in here knows what a "site" is; that lives in
//! `provision`.
//!
//! ## Architecture
//!
//! - **`docker`**: `docker compose` invocation helpers and `docker inspect` parsing.
//! - **`fs`**: Plain file I/O, symlink replacement, and the `PrivilegedFs` seam.
//! - **`network`**: Template fetching and webhook notifications over HTTP.
//! - **`process`**: The `CommandRunner` seam every external command goes through.
//! - **`ui`**: Colored status lines and interactive prompts.
//!
//! Every side-effecting helper takes its collaborator (`&dyn CommandRunner`,
//! `&dyn PrivilegedFs`, a `TemplateSource`) as an argument so tests can swap
//! in doubles without touching process-wide state.
//!

/// `docker compose` helpers and container inspection.
pub mod docker;
/// Filesystem operations (I/O, links, privileged operations).
pub mod fs;
/// HTTP template source and webhook notifier.
pub mod network;
/// External command execution.
pub mod process;
/// Terminal output and prompts.
pub mod ui;
