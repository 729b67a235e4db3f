//! # Ploy Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Filesystem helpers shared by the commands and the provisioning workflow.
//!
//! - **`io`**: Directory creation, whole-file reads/writes, and line appends.
//! - **`links`**: Symlink replacement for `sites-enabled` entries.
//! - **`privileged`**: The `PrivilegedFs` seam for operations needing root
//!   (`SudoFs` for servers, `DirectFs` for root sessions and tests).
//!
//! ```rust
//! use crate::common::fs::{io, privileged::PrivilegedFs};
//! io::write_string_to_file(&compose_path, &content)?;
//! privileged.symlink(&available, &enabled)?;
//! ```
//!

/// Basic file I/O operations (`ensure_dir_exists`, `write_string_to_file`, `append_line`).
pub mod io;
/// Symlink management (`replace_symlink`, `remove_file_if_exists`).
pub mod links;
/// Privileged operations (`PrivilegedFs`, `SudoFs`, `DirectFs`).
pub mod privileged;
