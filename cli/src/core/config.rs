//! # Ploy Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! This module loads, expands, and validates the Ploy configuration. Every
//! setting has a working default, so the configuration file is optional:
//! a fresh server can run `ploy sites new` without writing any config.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. `PLOY_CONFIG` environment variable pointing at a TOML file
//! 2. User-specific `~/.config/ploy/config.toml`
//! 3. Default values defined in the code
//!
//! The `PLOY_TEST_ENV` environment variable is resolved into `Config::test_mode`
//! at load time. Test mode disables real `docker compose up` invocations and the
//! nginx reload so provisioning can be exercised deterministically.
//!
//! ## Examples
//!
//! ```toml
//! [paths]
//! services_dir = "~/.ploy"
//! sites_dir = "/srv/sites"
//! nginx_dir = "/etc/nginx"
//!
//! [templates]
//! base_url = "https://raw.githubusercontent.com/ploycloud/ploy-server-cli/main/docker/"
//!
//! [proxy]
//! upstream_server = "127.0.0.1:8080"
//!
//! [bootstrap]
//! verify_after_install = true
//! max_attempts = 2
//! ```
//!
use crate::core::error::{PloyError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Environment variable that switches Ploy into test mode.
pub const TEST_MODE_ENV: &str = "PLOY_TEST_ENV";
/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "PLOY_CONFIG";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub privilege: PrivilegeConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Resolved from `PLOY_TEST_ENV`, never read from the file.
    #[serde(skip)]
    pub test_mode: bool,
}

/// Filesystem locations used by the CLI.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Root for global services (global compose file, database data dirs).
    #[serde(default = "default_services_dir")]
    pub services_dir: String,
    /// One subdirectory per site hostname lives here.
    #[serde(default = "default_sites_dir")]
    pub sites_dir: String,
    /// Root for per-site deploy logs (`<log_dir>/sites/<hostname>/deploy.log`).
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// nginx root containing `sites-available` and `sites-enabled`.
    #[serde(default = "default_nginx_dir")]
    pub nginx_dir: String,
    /// Where generated files are staged before a privileged move. Defaults to the system temp dir.
    #[serde(default)]
    pub scratch_dir: Option<String>,
}

/// Where compose templates are fetched from.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    #[serde(default = "default_template_base_url")]
    pub base_url: String,
}

/// Reverse-proxy settings.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// `host:port` the generated upstream block forwards to.
    #[serde(default = "default_upstream_server")]
    pub upstream_server: String,
    /// systemd unit reloaded after a config change.
    #[serde(default = "default_proxy_service")]
    pub service_name: String,
}

/// Controls how privileged filesystem operations are executed.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PrivilegeConfig {
    /// Run privileged operations through `sudo`. When false they run in-process.
    #[serde(default = "default_use_sudo")]
    pub use_sudo: bool,
}

/// Service bootstrap policy.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Re-probe a service after installing it instead of assuming success.
    #[serde(default)]
    pub verify_after_install: bool,
    /// Install attempts allowed when verification is enabled.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_services_dir() -> String {
    "~/.ploy".to_string()
}
fn default_sites_dir() -> String {
    "~/.ploy/sites".to_string()
}
fn default_log_dir() -> String {
    "~/.ploy/logs".to_string()
}
fn default_nginx_dir() -> String {
    "/etc/nginx".to_string()
}
fn default_template_base_url() -> String {
    "https://raw.githubusercontent.com/ploycloud/ploy-server-cli/main/docker/".to_string()
}
fn default_upstream_server() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_proxy_service() -> String {
    "nginx".to_string()
}
fn default_use_sudo() -> bool {
    true
}
fn default_max_attempts() -> u32 {
    1
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            services_dir: default_services_dir(),
            sites_dir: default_sites_dir(),
            log_dir: default_log_dir(),
            nginx_dir: default_nginx_dir(),
            scratch_dir: None,
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_template_base_url(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_server: default_upstream_server(),
            service_name: default_proxy_service(),
        }
    }
}

impl Default for PrivilegeConfig {
    fn default() -> Self {
        Self {
            use_sudo: default_use_sudo(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            verify_after_install: false,
            max_attempts: default_max_attempts(),
        }
    }
}

impl Config {
    pub fn services_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.services_dir)
    }

    pub fn sites_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.sites_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.log_dir)
    }

    pub fn nginx_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.nginx_dir)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.paths
            .scratch_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Compose file for the global services (MySQL, Redis, proxy helpers).
    pub fn global_compose(&self) -> PathBuf {
        self.services_dir().join("docker-compose.yml")
    }

    pub fn mysql_dir(&self) -> PathBuf {
        self.services_dir().join("database").join("mysql")
    }

    pub fn redis_dir(&self) -> PathBuf {
        self.services_dir().join("database").join("redis")
    }

    /// Data directory for the proxy helpers under the services root (not the nginx root).
    pub fn nginx_data_dir(&self) -> PathBuf {
        self.services_dir().join("nginx")
    }
}

/// Returns true when an environment value enables test mode.
pub fn is_test_mode_value(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

pub fn load_config() -> Result<Config> {
    let mut config = match config_file_path()? {
        Some(path) if path.is_file() => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(&path)?
        }
        Some(path) => {
            debug!("Configuration file not found at {}", path.display());
            Config::default()
        }
        None => Config::default(),
    };
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    config.test_mode = is_test_mode_value(std::env::var(TEST_MODE_ENV).ok().as_deref());
    if config.test_mode {
        info!("{} is set, external side effects are disabled", TEST_MODE_ENV);
    }
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn config_file_path() -> Result<Option<PathBuf>> {
    if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(shellexpand::tilde(&explicit).into_owned());
        if !path.is_file() {
            return Err(anyhow!(PloyError::Config(format!(
                "{} points at '{}', which is not a file",
                CONFIG_PATH_ENV,
                path.display()
            ))));
        }
        return Ok(Some(path));
    }
    Ok(ProjectDirs::from("com", "PloyCloud", "ploy")
        .map(|dirs| dirs.config_dir().join("config.toml")))
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    let paths = &mut config.paths;
    for value in [
        &mut paths.services_dir,
        &mut paths.sites_dir,
        &mut paths.log_dir,
        &mut paths.nginx_dir,
    ] {
        *value = shellexpand::tilde(value.as_str()).into_owned();
    }
    if let Some(scratch) = paths.scratch_dir.as_mut() {
        *scratch = shellexpand::tilde(scratch.as_str()).into_owned();
    }
    debug!("Expanded paths: {:?}", config.paths);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let paths = &config.paths;
    for (name, value) in [
        ("services_dir", &paths.services_dir),
        ("sites_dir", &paths.sites_dir),
        ("log_dir", &paths.log_dir),
        ("nginx_dir", &paths.nginx_dir),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!(PloyError::Config(format!(
                "paths.{} cannot be empty",
                name
            ))));
        }
    }
    let base_url = &config.templates.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(anyhow!(PloyError::Config(format!(
            "templates.base_url must be an http(s) URL, got '{}'",
            base_url
        ))));
    }
    if !config.proxy.upstream_server.contains(':') {
        return Err(anyhow!(PloyError::Config(format!(
            "proxy.upstream_server must be HOST:PORT, got '{}'",
            config.proxy.upstream_server
        ))));
    }
    if config.bootstrap.max_attempts == 0 {
        return Err(anyhow!(PloyError::Config(
            "bootstrap.max_attempts must be at least 1".to_string()
        )));
    }
    Ok(())
}
