//! # Ploy Reverse-Proxy Config Writer
//!
//! File: cli/src/provision/proxy.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Generates one nginx virtual host per domain and enables it:
//!
//! 1. `mkdir -p` for `sites-available` and `sites-enabled` under the nginx root.
//! 2. Stage the rendered block in the scratch dir, move it to
//!    `sites-available/<domain>.conf`, then set `root:root` and `644`.
//! 3. Remove and recreate `sites-enabled/<domain>.conf` as a symlink to the
//!    `sites-available` file.
//! 4. `systemctl reload <service>` unless test mode is on.
//!
//! The domain must pass `validate_domain` before anything is touched; it is
//! used verbatim in file names and in `server_name`.
//!
//! Each step goes through `PrivilegedFs`. A failure stops the sequence
//! without undoing earlier steps, so a written but unenabled config can be
//! left behind; the returned error names the step that failed. The staged
//! scratch copy is removed when installing it fails.
//!
use crate::common::fs::io;
use crate::common::fs::privileged::PrivilegedFs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::templating::render_inline;
use crate::provision::validate::validate_domain;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_OWNER: &str = "root:root";
const CONFIG_MODE: &str = "644";

const VHOST_TEMPLATE: &str = r#"upstream {{ upstream }} {
    server {{ upstream_server }};
}

server {
    listen 80;
    listen [::]:80;
    server_name {{ domain }};

    location / {
        proxy_pass http://{{ upstream }};
        proxy_http_version 1.1;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection "upgrade";
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
        proxy_read_timeout 300s;
    }
}
"#;

/// `app.example.com` becomes `app-example-com`.
pub fn upstream_name(domain: &str) -> String {
    domain
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

pub fn render_proxy_config(domain: &str, upstream_server: &str) -> Result<String> {
    let mut context = BTreeMap::new();
    context.insert("domain", domain.to_string());
    context.insert("upstream", upstream_name(domain));
    context.insert("upstream_server", upstream_server.to_string());
    render_inline(VHOST_TEMPLATE, &context)
        .with_context(|| format!("Failed to render nginx config for {}", domain))
}

/// Locations of a domain's config and its enabling symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPaths {
    pub available_dir: PathBuf,
    pub enabled_dir: PathBuf,
    pub available: PathBuf,
    pub enabled: PathBuf,
}

impl ProxyPaths {
    pub fn new(nginx_dir: &Path, domain: &str) -> Self {
        let available_dir = nginx_dir.join("sites-available");
        let enabled_dir = nginx_dir.join("sites-enabled");
        let file = format!("{}.conf", domain);
        Self {
            available: available_dir.join(&file),
            enabled: enabled_dir.join(&file),
            available_dir,
            enabled_dir,
        }
    }
}

/// Writes, installs, enables, and reloads the proxy config for `domain`.
pub fn write_proxy_config(config: &Config, fs: &dyn PrivilegedFs, domain: &str) -> Result<ProxyPaths> {
    validate_domain(domain)?;
    let content = render_proxy_config(domain, &config.proxy.upstream_server)?;
    let paths = ProxyPaths::new(&config.nginx_dir(), domain);

    fs.create_dirs(&[&paths.available_dir, &paths.enabled_dir])
        .context("Failed to create nginx config directories")?;

    let staged = config
        .scratch_dir()
        .join(format!("ploy-{}-{}.conf", domain, std::process::id()));
    io::write_string_to_file(&staged, &content)
        .context("Failed to stage nginx config")?;
    if let Err(e) = fs.install_file(&staged, &paths.available, CONFIG_OWNER, CONFIG_MODE) {
        if let Err(cleanup) = io::remove_file_if_exists(&staged) {
            warn!("Could not remove staged nginx config: {:#}", cleanup);
        }
        return Err(e.context(format!("Failed to install nginx config {:?}", paths.available)));
    }

    fs.remove_file(&paths.enabled)
        .with_context(|| format!("Failed to remove existing link {:?}", paths.enabled))?;
    fs.symlink(&paths.available, &paths.enabled)
        .with_context(|| format!("Failed to enable nginx config {:?}", paths.enabled))?;
    debug!("Linked {:?} -> {:?}", paths.enabled, paths.available);

    if config.test_mode {
        info!("Test mode: skipping {} reload", config.proxy.service_name);
    } else {
        fs.run("systemctl", &["reload", &config.proxy.service_name])
            .with_context(|| format!("Failed to reload {}", config.proxy.service_name))?;
    }
    info!("Proxy config for {} enabled", domain);
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fs::privileged::{DirectFs, SudoFs};
    use crate::common::process::testing::ScriptedRunner;
    use crate::common::process::CommandOutput;
    use crate::core::config::testing::config_rooted_at;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_upstream_name() {
        assert_eq!(upstream_name("app.example.com"), "app-example-com");
        assert_eq!(upstream_name("my_site.local:8080"), "my-site-local-8080");
    }

    #[test]
    fn test_render_proxy_config() -> Result<()> {
        let conf = render_proxy_config("app.example.com", "127.0.0.1:8080")?;
        assert!(conf.contains("server_name app.example.com;"));
        assert!(conf.contains("upstream app-example-com {"));
        assert!(conf.contains("proxy_pass http://app-example-com;"));
        assert!(conf.contains("server 127.0.0.1:8080;"));
        assert!(conf.contains("proxy_set_header Upgrade $http_upgrade;"));
        assert!(conf.contains("proxy_set_header Connection \"upgrade\";"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_write_proxy_config_direct() -> Result<()> {
        let dir = tempdir()?;
        let config = config_rooted_at(dir.path());
        let runner = ScriptedRunner::new();
        let paths = write_proxy_config(&config, &DirectFs::new(&runner), "app.example.com")?;

        assert!(fs::read_to_string(&paths.available)?.contains("server_name app.example.com;"));
        assert_eq!(fs::read_link(&paths.enabled)?, paths.available);
        // Test mode: no reload.
        assert!(runner.calls().is_empty());

        // Rewriting replaces the link instead of failing on it.
        write_proxy_config(&config, &DirectFs::new(&runner), "app.example.com")?;
        assert_eq!(fs::read_link(&paths.enabled)?, paths.available);
        Ok(())
    }

    #[test]
    fn test_write_proxy_config_sudo_sequence() -> Result<()> {
        let dir = tempdir()?;
        let mut config = config_rooted_at(dir.path());
        config.test_mode = false;
        let runner = ScriptedRunner::new();
        let paths = write_proxy_config(&config, &SudoFs::new(&runner), "a.io")?;

        let calls = runner.calls();
        let verbs: Vec<&str> = calls
            .iter()
            .map(|c| c.split_whitespace().nth(1).unwrap_or(""))
            .collect();
        assert_eq!(verbs, vec!["mkdir", "mv", "chown", "chmod", "rm", "ln", "systemctl"]);
        assert!(calls[2].ends_with(&format!("root:root {}", paths.available.display())));
        assert_eq!(calls[6], "sudo systemctl reload nginx");
        Ok(())
    }

    #[test]
    fn test_write_proxy_config_stops_on_failure() -> Result<()> {
        let dir = tempdir()?;
        let mut config = config_rooted_at(dir.path());
        config.test_mode = false;
        let runner = ScriptedRunner::new().on("sudo ln", CommandOutput::failed("exists"));
        let err = write_proxy_config(&config, &SudoFs::new(&runner), "a.io").unwrap_err();
        assert!(err.to_string().contains("Failed to enable nginx config"));
        assert_eq!(runner.count("sudo systemctl"), 0);
        Ok(())
    }

    #[test]
    fn test_write_proxy_config_rejects_unsafe_domain() -> Result<()> {
        let dir = tempdir()?;
        let config = config_rooted_at(dir.path());
        let runner = ScriptedRunner::new();
        for domain in ["../../escaped", "a.com; include /etc/shadow"] {
            let err = write_proxy_config(&config, &SudoFs::new(&runner), domain).unwrap_err();
            assert!(err.to_string().contains("invalid domain"));
        }
        assert!(runner.calls().is_empty());
        assert!(!config.scratch_dir().exists());
        Ok(())
    }

    #[test]
    fn test_failed_install_removes_staged_file() -> Result<()> {
        let dir = tempdir()?;
        let config = config_rooted_at(dir.path());
        let runner = ScriptedRunner::new().on("sudo mv", CommandOutput::failed("permission denied"));
        let err = write_proxy_config(&config, &SudoFs::new(&runner), "a.io").unwrap_err();

        assert!(err.to_string().contains("Failed to install nginx config"));
        let leftovers: Vec<_> = fs::read_dir(config.scratch_dir())?.collect();
        assert!(leftovers.is_empty());
        assert_eq!(runner.count("sudo ln"), 0);
        Ok(())
    }
}
