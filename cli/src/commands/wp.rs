//! # Ploy WP-CLI Passthrough
//!
//! File: cli/src/commands/wp.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! `ploy wp <args...>` runs WP-CLI inside the current site's PHP container:
//!
//! 1. Walk up from the current directory (stopping at `$HOME`) to the nearest
//!    `docker-compose*.yml`.
//! 2. Pick the service that hosts PHP: `php`, else `litespeed`.
//! 3. `docker compose -f <file> exec [-T] <service> wp <args...>`; `-T` is added
//!    when stdout is not a terminal.
//!
//! ```bash
//! cd /srv/sites/blog/wp-content/plugins
//! ploy wp plugin list
//! ploy wp user create bob bob@example.com --role=author
//! ```
//!
use crate::common::docker::compose;
use crate::common::process::{CommandRunner, SystemRunner};
use crate::core::error::Result;
use anyhow::{bail, Context};
use clap::Parser;
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
pub struct WpArgs {
    /// Arguments passed to `wp` unchanged.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

pub fn run_wp(runner: &dyn CommandRunner, start: &Path, stop_at: Option<&Path>, wp_args: &[String]) -> Result<()> {
    let Some(compose_file) = compose::find_compose_file(start, stop_at) else {
        bail!("No docker-compose file found in {:?} or its parent directories", start);
    };
    let service = compose::detect_app_service(&compose_file)?;
    info!("Running WP-CLI in service '{}' of {:?}", service, compose_file);

    let mut exec_args = vec!["exec", service.as_str(), "wp"];
    exec_args.extend(wp_args.iter().map(String::as_str));
    compose::run_compose(runner, &compose_file, &exec_args)
}

pub async fn handle_wp(args: WpArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let home = dirs::home_dir();
    run_wp(&SystemRunner, &cwd, home.as_deref(), &args.args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::testing::ScriptedRunner;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_wp_args_keep_flags() {
        let args = WpArgs::try_parse_from(["wp", "user", "list", "--format=json", "-v"]).unwrap();
        assert_eq!(args.args, vec!["user", "list", "--format=json", "-v"]);
    }

    #[test]
    fn test_run_wp_from_nested_dir() -> Result<()> {
        let root = tempdir()?;
        let site = root.path().join("blog");
        let nested = site.join("wp-content/plugins");
        fs::create_dir_all(&nested)?;
        let file = site.join("docker-compose-wp-php8.3.yml");
        fs::write(&file, "services:\n  php:\n    image: wordpress\n")?;

        let runner = ScriptedRunner::new();
        run_wp(&runner, &nested, Some(root.path()), &["plugin".into(), "list".into()])?;

        let call = &runner.calls()[0];
        assert!(call.starts_with(&format!("docker compose -f {} exec", file.display())));
        assert!(call.ends_with("php wp plugin list"));
        Ok(())
    }

    #[test]
    fn test_run_wp_without_compose_file() -> Result<()> {
        let root = tempdir()?;
        let runner = ScriptedRunner::new();
        let err = run_wp(&runner, root.path(), Some(root.path()), &[]).unwrap_err();
        assert!(err.to_string().contains("No docker-compose file found"));
        assert!(runner.calls().is_empty());
        Ok(())
    }
}
