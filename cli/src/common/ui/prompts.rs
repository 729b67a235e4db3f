//! # Ploy Interactive Prompts
//!
//! File: cli/src/common/ui/prompts.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! `ploy sites new` asks for any required field left off the command line.
//! The launcher only sees the `Prompter` trait:
//!
//! - **`DialoguerPrompter`**: Real terminal prompts via `dialoguer`.
//! - **`DefaultsPrompter`**: Never blocks; answers every question with its
//!   default. Used for `--non-interactive` runs and in tests. A missing value
//!   without a default comes back empty and is rejected later by validation.
//!
use crate::core::error::{PloyError, Result};
use anyhow::anyhow;
use dialoguer::{Input, Select};

pub trait Prompter {
    /// Free-text input. An empty answer is allowed.
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Numeric input, re-asked until it parses.
    fn input_u32(&self, prompt: &str, default: u32) -> Result<u32>;

    /// One of `items`, returned as the chosen string.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<String>;
}

fn prompt_error(prompt: &str, e: dialoguer::Error) -> anyhow::Error {
    anyhow!(PloyError::Prompt(format!("{}: {}", prompt, e)))
}

pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        input.interact_text().map_err(|e| prompt_error(prompt, e))
    }

    fn input_u32(&self, prompt: &str, default: u32) -> Result<u32> {
        Input::<u32>::new()
            .with_prompt(prompt)
            .default(default)
            .interact_text()
            .map_err(|e| prompt_error(prompt, e))
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<String> {
        let index = Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(|e| prompt_error(prompt, e))?;
        items
            .get(index)
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!(PloyError::Prompt(format!("{}: no selection", prompt))))
    }
}

/// Answers with defaults, never touching the terminal.
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn input(&self, _prompt: &str, default: Option<&str>) -> Result<String> {
        Ok(default.unwrap_or_default().to_string())
    }

    fn input_u32(&self, _prompt: &str, default: u32) -> Result<u32> {
        Ok(default)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<String> {
        items
            .get(default)
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!(PloyError::Prompt(format!("{}: no default choice", prompt))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_prompter() -> Result<()> {
        let p = DefaultsPrompter;
        assert_eq!(p.input("Domain", Some("a.localhost"))?, "a.localhost");
        assert_eq!(p.input("Domain", None)?, "");
        assert_eq!(p.input_u32("Max replicas", 3)?, 3);
        assert_eq!(p.select("Scaling", &["static", "dynamic"], 1)?, "dynamic");
        assert!(p.select("Scaling", &[], 0).is_err());
        Ok(())
    }
}
