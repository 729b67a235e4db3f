//! # Ploy Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout the Ploy CLI.
//! Every provisioning stage wraps the first failure it meets into one of
//! these variants and returns it upward; the launcher never retries and
//! never classifies errors as recoverable.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `PloyError`: A custom error enum using `thiserror` for specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` so call sites can add context
//!
//! The error kinds cover:
//! - Template fetch failures (network errors, non-200 responses)
//! - Parameter validation failures
//! - Non-zero exits from external commands (`docker`, `sudo`, `systemctl`)
//! - Filesystem and path failures
//! - Configuration errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error kind
//! anyhow::bail!(PloyError::Validation("domain is required".into()));
//!
//! // Check the kind of a propagated error
//! if e.downcast_ref::<PloyError>().is_some_and(|pe| matches!(pe, PloyError::Fetch { .. })) {
//!     // ...
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the Ploy application.
#[derive(Error, Debug)]
pub enum PloyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to fetch template from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Service '{service}' is unavailable: {reason}")]
    ServiceUnavailable { service: String, reason: String },

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Type alias for Result using anyhow::Error.
pub type Result<T> = anyhow::Result<T>;
