//! # Ploy Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components used by every
//! command: configuration loading, the error taxonomy, and text templating.
//!
//! ## Architecture
//!
//! - `config`: Loads `~/.config/ploy/config.toml`, expands paths, validates values,
//!   and resolves the test-mode environment flag
//! - `error`: `PloyError` and the crate-wide `Result` alias
//! - `templating`: `${KEY}` placeholder substitution for compose templates and
//!   inline Tera rendering for the nginx virtual-host block
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{PloyError, Result}; // For error handling
//! use crate::core::templating; // For compose/nginx text generation
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
