//! # Ploy UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Terminal output helpers shared by every command, plus the `prompts`
//! submodule for interactive input.
//!
//! Status lines go to stdout; warnings and errors go to stderr so that
//! piping `ploy services details mysql` output stays clean.
//!
//! ```text
//! ✓ Site launched successfully
//! ⚠ Failed to send webhook: connection refused
//! Error: domain is required
//! ```
//!
use colored::Colorize;

/// Interactive prompts (`Prompter`, `DialoguerPrompter`, `DefaultsPrompter`).
pub mod prompts;

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn step(message: &str) {
    println!("{} {}", "▶".cyan(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{}", format!("Error: {}", message).red());
}

/// `label: value` with a green or red marker, as used by `ploy status`.
pub fn check_line(label: &str, ok: bool, detail: &str) {
    let marker = if ok { "✓".green() } else { "✗".red() };
    println!("{} {:<24} {}", marker, label, detail);
}
