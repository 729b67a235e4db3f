//! # Ploy Site Launcher
//!
//! File: cli/src/provision/launcher.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Brings a new site online. The pipeline is linear:
//!
//! 1. Derive the domain from the hostname when none was given (`<hostname>.localhost`).
//! 2. Make sure `nginx-proxy` is running (`ServiceBootstrapper`).
//! 3. Write and enable the reverse-proxy config for the domain.
//! 4. Prompt for any required field still empty.
//! 5. Validate the assembled parameters.
//! 6. For an internal database: make sure `mysql` is running, then read its
//!    connection details from `docker inspect`.
//! 7. Fetch the static or dynamic compose template and substitute variables.
//! 8. Write `<sites_dir>/<hostname>/docker-compose-wp-php<version>.yml`, removing
//!    any other compose file left there by an earlier launch.
//! 9. `docker compose -f <file> up -d` (skipped in test mode).
//! 10. Report success.
//!
//! Every stage appends a line to the site's deploy log and, when a webhook is
//! configured, posts the same message. The first failing stage is logged as
//! `<stage> failed: <error>` and its error is returned; later stages do not run
//! and earlier side effects (for example the proxy config) stay in place.
//!
//! ## Collaborators
//!
//! Everything with side effects arrives through `LaunchContext`, so tests run
//! the whole pipeline against a `ScriptedRunner`, `DirectFs` on a temporary
//! directory, an in-memory `TemplateSource`, and the `DefaultsPrompter`.
//!
use crate::common::docker::{compose, inspect};
use crate::common::fs::io;
use crate::common::fs::privileged::PrivilegedFs;
use crate::common::network::http::{TemplateSource, WebhookNotifier};
use crate::common::process::CommandRunner;
use crate::common::ui::{self, prompts::Prompter};
use crate::core::config::Config;
use crate::core::error::{PloyError, Result};
use crate::core::templating::{substitute_placeholders, unresolved_placeholders};
use crate::provision::bootstrap::ServiceBootstrapper;
use crate::provision::deploy_log::DeployLog;
use crate::provision::proxy::{self, ProxyPaths};
use crate::provision::site::{self, DbSource, ScalingType, Site, SiteRequest, SiteType};
use crate::provision::validate::{validate_domain, validate_inputs};
use anyhow::{anyhow, Context};
use std::path::PathBuf;
use tracing::{info, warn};

const PROXY_SERVICE: &str = "nginx-proxy";
const DATABASE_SERVICE: &str = "mysql";

/// Collaborators for one launch.
pub struct LaunchContext<'a, T: TemplateSource> {
    pub config: &'a Config,
    pub runner: &'a dyn CommandRunner,
    pub fs: &'a dyn PrivilegedFs,
    pub templates: &'a T,
    pub prompter: &'a dyn Prompter,
    pub webhook: Option<&'a WebhookNotifier>,
    /// Path of the `ploy` executable used for service probes and installs.
    pub ploy_bin: String,
}

/// What a successful launch produced.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub domain: String,
    pub compose_file: PathBuf,
    pub proxy: ProxyPaths,
    pub log_file: PathBuf,
}

/// Mirrors progress to the deploy log, the terminal, and the webhook.
struct Progress<'a> {
    log: DeployLog,
    webhook: Option<&'a WebhookNotifier>,
}

impl Progress<'_> {
    async fn report(&self, message: &str) -> Result<()> {
        info!("{}", message);
        ui::step(message);
        self.log.append(message)?;
        if let Some(hook) = self.webhook {
            hook.notify(message).await;
        }
        Ok(())
    }

    /// Logs a failed stage and passes the error through.
    async fn check<R>(&self, stage: &str, result: Result<R>) -> Result<R> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                let message = format!("{} failed: {:#}", stage, e);
                warn!("{}", message);
                if let Err(log_err) = self.log.append(&message) {
                    warn!("Could not write deploy log: {:#}", log_err);
                }
                if let Some(hook) = self.webhook {
                    hook.notify(&message).await;
                }
                Err(e.context(format!("{} failed", stage)))
            }
        }
    }
}

fn ensure_hostname(req: &mut SiteRequest, prompter: &dyn Prompter) -> Result<()> {
    if req.hostname.is_empty() {
        req.hostname = prompter.input("Site hostname", None)?.trim().to_string();
    }
    let h = &req.hostname;
    if h.is_empty() {
        return Err(anyhow!(PloyError::Validation("hostname is required".into())));
    }
    if h.starts_with('.') || h.contains('/') || h.contains('\\') {
        return Err(anyhow!(PloyError::Validation(format!(
            "invalid hostname '{}'",
            h
        ))));
    }
    Ok(())
}

fn prompt_if_empty(
    prompter: &dyn Prompter,
    value: &mut String,
    prompt: &str,
    default: Option<&str>,
) -> Result<()> {
    if value.is_empty() {
        *value = prompter.input(prompt, default)?.trim().to_string();
    }
    Ok(())
}

fn select_if_empty(prompter: &dyn Prompter, value: &mut String, prompt: &str, items: &[&str]) -> Result<()> {
    if value.is_empty() {
        *value = prompter.select(prompt, items, 0)?;
    }
    Ok(())
}

/// Stage 4: fills every required field left empty.
fn complete_request(req: &mut SiteRequest, prompter: &dyn Prompter) -> Result<()> {
    select_if_empty(prompter, &mut req.site_type, "Site type", &SiteType::VALUES)?;
    prompt_if_empty(prompter, &mut req.domain, "Domain or subdomain", None)?;
    select_if_empty(prompter, &mut req.db_source, "Database source", &DbSource::VALUES)?;

    if req.db_source == DbSource::External.as_str() {
        prompt_if_empty(prompter, &mut req.db.host, "Database host", None)?;
        prompt_if_empty(prompter, &mut req.db.port, "Database port", Some("3306"))?;
        prompt_if_empty(prompter, &mut req.db.name, "Database name", None)?;
        prompt_if_empty(prompter, &mut req.db.user, "Database user", None)?;
        prompt_if_empty(prompter, &mut req.db.password, "Database password", None)?;
    }

    select_if_empty(prompter, &mut req.scaling_type, "Scaling type", &ScalingType::VALUES)?;
    if req.scaling_type == ScalingType::Dynamic.as_str() && req.max_replicas == 0 {
        loop {
            let value = prompter.input_u32("Maximum number of replicas", req.replicas)?;
            if value >= req.replicas {
                req.max_replicas = value;
                break;
            }
            ui::warning(&format!("Value must be at least {}", req.replicas));
        }
    }

    if req.php_version.is_empty() {
        req.php_version = site::DEFAULT_PHP_VERSION.to_string();
    }
    if req.site_id.is_empty() {
        req.site_id = req.hostname.clone();
    }
    Ok(())
}

/// Runs the full launch pipeline for `req`.
pub async fn launch_site<T: TemplateSource>(ctx: &LaunchContext<'_, T>, mut req: SiteRequest) -> Result<LaunchReport> {
    let config = ctx.config;
    ensure_hostname(&mut req, ctx.prompter)?;

    let progress = Progress {
        log: DeployLog::for_site(&config.log_dir(), &req.hostname),
        webhook: ctx.webhook,
    };
    progress.report("Starting site creation process").await?;

    // 1
    if req.domain.is_empty() {
        req.domain = site::default_domain(&req.hostname);
    }
    progress.report(&format!("Using domain {}", req.domain)).await?;

    // 2
    let bootstrapper = ServiceBootstrapper::new(ctx.runner, ctx.ploy_bin.clone(), &config.bootstrap);
    progress.report("Ensuring nginx-proxy is running").await?;
    progress
        .check("Proxy bootstrap", bootstrapper.ensure(PROXY_SERVICE))
        .await?;

    // 3
    progress.check("Domain validation", validate_domain(&req.domain)).await?;
    progress
        .report(&format!("Configuring reverse proxy for {}", req.domain))
        .await?;
    let proxy_paths = progress
        .check(
            "Proxy configuration",
            proxy::write_proxy_config(config, ctx.fs, &req.domain),
        )
        .await?;

    // 4 + 5
    progress
        .check("Prompt", complete_request(&mut req, ctx.prompter))
        .await?;
    progress.report("Validating site parameters").await?;
    progress.check("Validation", validate_inputs(&req)).await?;
    let mut site = progress.check("Validation", Site::from_request(req)).await?;
    info!(
        "Launching {} site {} ({} scaling, {} database)",
        site.site_type.as_str(),
        site.hostname,
        site.scaling,
        site.db_source
    );

    // 6
    if site.db_source == DbSource::Internal {
        progress.report("Ensuring mysql is running").await?;
        progress
            .check("Database bootstrap", bootstrapper.ensure(DATABASE_SERVICE))
            .await?;
        let details = progress
            .check("Database details", inspect::mysql_details(ctx.runner))
            .await?;
        site.db = details.into();
    }

    // 7
    let template_name = site.scaling.template_name();
    progress
        .report(&format!("Fetching template {}", template_name))
        .await?;
    let raw = progress
        .check("Template fetch", ctx.templates.fetch(template_name).await)
        .await?;
    let text = progress
        .check(
            "Template fetch",
            String::from_utf8(raw).with_context(|| format!("Template {} is not UTF-8", template_name)),
        )
        .await?;
    let compose_content = substitute_placeholders(&text, &site.template_vars());
    let unresolved = unresolved_placeholders(&compose_content);
    if !unresolved.is_empty() {
        warn!("Unresolved placeholders left in compose file: {}", unresolved.join(", "));
    }

    // 8
    let site_dir = site::site_dir(&config.sites_dir(), &site.hostname);
    let compose_file = site_dir.join(site.compose_file_name());
    for stale in compose::compose_files_in(&site_dir)
        .into_iter()
        .filter(|path| *path != compose_file)
    {
        progress
            .check("Compose file", io::remove_file_if_exists(&stale))
            .await?;
        progress
            .report(&format!("Removed previous compose file {}", stale.display()))
            .await?;
    }
    progress
        .report(&format!("Writing compose file {}", compose_file.display()))
        .await?;
    progress
        .check(
            "Compose file",
            io::write_string_to_file(&compose_file, &compose_content),
        )
        .await?;

    // 9
    if config.test_mode {
        progress.report("Test mode: skipping docker compose up").await?;
    } else {
        progress.report("Starting containers").await?;
        progress
            .check(
                "Compose up",
                compose::run_compose(ctx.runner, &compose_file, &["up", "-d"]),
            )
            .await?;
    }

    // 10
    progress.report("Site launched successfully").await?;
    ui::success(&format!("Site {} is live at http://{}", site.hostname, site.domain));

    Ok(LaunchReport {
        domain: site.domain,
        compose_file,
        proxy: proxy_paths,
        log_file: progress.log.path().to_path_buf(),
    })
}
