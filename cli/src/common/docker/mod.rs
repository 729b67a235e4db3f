//! # Ploy Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Ploy talks to Docker only through the `docker` CLI, run via a
//! `CommandRunner`. Nothing here links against the Docker Engine API.
//!
//! - **`compose`**: `docker compose` argument building, compose-file discovery,
//!   and app-service detection for WP-CLI.
//! - **`inspect`**: Reads connection details (`ServiceDetails`) out of
//!   `docker ps` / `docker inspect` output.
//!

/// `docker compose` helpers (`run_compose`, `find_compose_file`, `detect_app_service`).
pub mod compose;
/// Service connection details from `docker inspect` (`mysql_details`, `ServiceDetails`).
pub mod inspect;
