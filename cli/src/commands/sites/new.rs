//! # Ploy Sites New Handler
//!
//! File: cli/src/commands/sites/new.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Implements `ploy sites new`. Flags become a `SiteRequest`; everything else
//! happens in `provision::launcher::launch_site`.
//!
//! Fields left off the command line are prompted for. With
//! `--non-interactive` (or when stdin is not a terminal) the prompts answer
//! with their defaults instead, and anything still missing fails validation.
//!
use crate::commands::ploy_bin;
use crate::common::fs::privileged;
use crate::common::network::http::{HttpTemplateSource, WebhookNotifier};
use crate::common::process::SystemRunner;
use crate::common::ui::prompts::{DefaultsPrompter, DialoguerPrompter, Prompter};
use crate::core::config;
use crate::core::error::Result;
use crate::provision::launcher::{launch_site, LaunchContext};
use crate::provision::site::{DbCredentials, SiteRequest, DEFAULT_PHP_VERSION};
use clap::Parser;
use std::io::IsTerminal;
use tracing::info;

/// # Sites New Arguments (`NewArgs`)
///
/// Every site parameter can be passed as a flag. The snake_case spellings
/// (`--db_source`, `--max_replicas`, ...) are accepted as aliases.
#[derive(Parser, Debug)]
#[command(about = "Launch a new site")]
pub struct NewArgs {
    /// Site type (`wp`).
    #[arg(long = "type", value_name = "TYPE")]
    site_type: Option<String>,

    /// Site hostname; also the name of its directory under the sites dir.
    #[arg(long)]
    hostname: Option<String>,

    /// Domain or subdomain. Defaults to `<hostname>.localhost`.
    #[arg(long)]
    domain: Option<String>,

    /// Identifier passed to the compose template as `SITE_ID`. Defaults to the hostname.
    #[arg(long, alias = "site_id")]
    site_id: Option<String>,

    #[arg(long, alias = "php_version", default_value = DEFAULT_PHP_VERSION)]
    php_version: String,

    /// Database source: `internal` (managed MySQL) or `external`.
    #[arg(long, alias = "db_source")]
    db_source: Option<String>,

    /// External database host.
    #[arg(long, alias = "db_host")]
    db_host: Option<String>,
    #[arg(long, alias = "db_port")]
    db_port: Option<String>,
    #[arg(long, alias = "db_name")]
    db_name: Option<String>,
    #[arg(long, alias = "db_user")]
    db_user: Option<String>,
    #[arg(long, alias = "db_password")]
    db_password: Option<String>,

    /// Scaling type: `static` or `dynamic`.
    #[arg(long, alias = "scaling_type")]
    scaling_type: Option<String>,

    #[arg(long, default_value_t = 1)]
    replicas: u32,

    /// Upper replica bound for dynamic scaling. Prompted for when 0.
    #[arg(long, alias = "max_replicas", default_value_t = 0)]
    max_replicas: u32,

    /// URL that receives `{"message": ...}` progress posts.
    #[arg(long, env = "PLOY_WEBHOOK")]
    webhook: Option<String>,

    /// Never prompt; use defaults for anything missing.
    #[arg(long)]
    non_interactive: bool,
}

impl NewArgs {
    fn to_request(&self) -> SiteRequest {
        let s = |v: &Option<String>| v.clone().unwrap_or_default();
        SiteRequest {
            site_type: s(&self.site_type),
            hostname: s(&self.hostname),
            domain: s(&self.domain),
            site_id: s(&self.site_id),
            php_version: self.php_version.clone(),
            db_source: s(&self.db_source),
            db: DbCredentials {
                host: s(&self.db_host),
                port: s(&self.db_port),
                name: s(&self.db_name),
                user: s(&self.db_user),
                password: s(&self.db_password),
            },
            scaling_type: s(&self.scaling_type),
            replicas: self.replicas,
            max_replicas: self.max_replicas,
        }
    }
}

pub async fn handle_new(args: NewArgs) -> Result<()> {
    info!("Handling sites new (hostname: {:?})", args.hostname);
    let config = config::load_config()?;
    let runner = SystemRunner;
    let fs = privileged::from_config(&config, &runner);
    let templates = HttpTemplateSource::new(&config.templates.base_url)?;
    let webhook = args
        .webhook
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(WebhookNotifier::new)
        .transpose()?;

    let interactive = !args.non_interactive && std::io::stdin().is_terminal();
    let prompter: &dyn Prompter = if interactive {
        &DialoguerPrompter
    } else {
        &DefaultsPrompter
    };

    let ctx = LaunchContext {
        config: &config,
        runner: &runner,
        fs: fs.as_ref(),
        templates: &templates,
        prompter,
        webhook: webhook.as_ref(),
        ploy_bin: ploy_bin(),
    };
    let report = launch_site(&ctx, args.to_request()).await?;

    println!("Compose file: {}", report.compose_file.display());
    println!("Proxy config: {}", report.proxy.available.display());
    println!("Deploy log:   {}", report.log_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_args_defaults() {
        let args = NewArgs::try_parse_from(["new"]).unwrap();
        let req = args.to_request();
        assert_eq!(req.php_version, "8.3");
        assert_eq!(req.replicas, 1);
        assert_eq!(req.max_replicas, 0);
        assert!(req.hostname.is_empty());
        assert!(!args.non_interactive);
    }

    #[test]
    fn test_new_args_full() {
        let args = NewArgs::try_parse_from([
            "new",
            "--type",
            "wp",
            "--hostname",
            "shop",
            "--db-source",
            "external",
            "--db-host",
            "db.example.com",
            "--scaling_type",
            "dynamic",
            "--replicas",
            "2",
            "--max-replicas",
            "5",
            "--non-interactive",
        ])
        .unwrap();
        let req = args.to_request();
        assert_eq!(req.site_type, "wp");
        assert_eq!(req.db_source, "external");
        assert_eq!(req.db.host, "db.example.com");
        assert_eq!(req.scaling_type, "dynamic");
        assert_eq!((req.replicas, req.max_replicas), (2, 5));
        assert!(args.non_interactive);
    }

    #[test]
    fn test_new_args_rejects_negative_replicas() {
        assert!(NewArgs::try_parse_from(["new", "--replicas", "-1"]).is_err());
    }
}
