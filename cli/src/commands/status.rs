//! # Ploy Host Status
//!
//! File: cli/src/commands/status.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! `ploy status` reports whether the host is ready to run sites: the Ploy
//! directories exist and the Docker daemon answers.
//!
use crate::common::process::{CommandRunner, SystemRunner};
use crate::common::ui;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheck {
    pub label: String,
    pub ok: bool,
    pub detail: String,
}

fn path_check(label: &str, path: &Path) -> StatusCheck {
    let ok = path.exists();
    StatusCheck {
        label: label.to_string(),
        ok,
        detail: format!("{} {}", path.display(), if ok { "exists" } else { "does not exist" }),
    }
}

pub fn collect_status(config: &Config, runner: &dyn CommandRunner) -> Vec<StatusCheck> {
    let mut checks = vec![
        path_check("Services directory", &config.services_dir()),
        path_check("Global compose file", &config.global_compose()),
        path_check("Sites directory", &config.sites_dir()),
        path_check("MySQL directory", &config.mysql_dir()),
        path_check("Redis directory", &config.redis_dir()),
        path_check("Nginx directory", &config.nginx_data_dir()),
    ];

    let version = runner
        .output("docker", &["version", "--format", "{{.Server.Version}}"])
        .ok()
        .filter(|out| out.success)
        .map(|out| out.stdout.trim().to_string())
        .filter(|v| !v.is_empty());
    checks.push(StatusCheck {
        label: "Docker version".into(),
        ok: version.is_some(),
        detail: version.unwrap_or_else(|| "unavailable".into()),
    });

    let daemon = runner
        .output("docker", &["info"])
        .is_ok_and(|out| out.success);
    checks.push(StatusCheck {
        label: "Docker daemon".into(),
        ok: daemon,
        detail: if daemon { "running" } else { "not running" }.into(),
    });
    checks
}

pub async fn handle_status() -> Result<()> {
    let config = config::load_config()?;
    println!("Ploy status");
    for check in collect_status(&config, &SystemRunner) {
        ui::check_line(&check.label, check.ok, &check.detail);
    }
    Ok(())
}
