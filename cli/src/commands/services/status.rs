//! # Ploy Service Status
//!
//! File: cli/src/commands/services/status.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! Prints exactly `<service> is running` or `<service> is not running`. The
//! bootstrapper matches on that text, so keep the wording stable.
//!
//! - `mysql`: a container whose name matches `mysql` shows up in `docker ps`.
//! - `nginx-proxy`: `systemctl is-active <proxy.service_name>` answers `active`.
//!
//! A probe that cannot run at all (no `docker`, no `systemctl`) counts as
//! not running.
//!
use super::ServiceName;
use crate::common::docker::inspect::running_container;
use crate::common::process::{CommandRunner, SystemRunner};
use crate::core::config::{self, Config};
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[arg(value_enum)]
    service: ServiceName,
}

pub fn is_service_running(runner: &dyn CommandRunner, config: &Config, service: ServiceName) -> bool {
    let probe = match service {
        ServiceName::Mysql => running_container(runner, "mysql").map(|c| c.is_some()),
        ServiceName::NginxProxy => runner
            .output("systemctl", &["is-active", &config.proxy.service_name])
            .map(|out| out.success && out.stdout.trim() == "active"),
    };
    probe.unwrap_or_else(|e| {
        debug!("Probe for {} failed: {:#}", service.as_str(), e);
        false
    })
}

pub fn status_line(service: ServiceName, running: bool) -> String {
    if running {
        format!("{} is running", service.as_str())
    } else {
        format!("{} is not running", service.as_str())
    }
}

pub fn handle_status(args: StatusArgs) -> Result<()> {
    let config = config::load_config()?;
    let running = is_service_running(&SystemRunner, &config, args.service);
    println!("{}", status_line(args.service, running));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::testing::ScriptedRunner;
    use crate::common::process::CommandOutput;
    use crate::provision::bootstrap::reports_running;

    #[test]
    fn test_mysql_probe() {
        let config = Config::default();
        let up = ScriptedRunner::new().on("docker ps", CommandOutput::ok("mysql-1\n"));
        assert!(is_service_running(&up, &config, ServiceName::Mysql));
        let down = ScriptedRunner::new().on("docker ps", CommandOutput::ok("\n"));
        assert!(!is_service_running(&down, &config, ServiceName::Mysql));
    }

    #[test]
    fn test_nginx_probe() {
        let config = Config::default();
        let active = ScriptedRunner::new().on("systemctl is-active nginx", CommandOutput::ok("active\n"));
        assert!(is_service_running(&active, &config, ServiceName::NginxProxy));
        let inactive = ScriptedRunner::new().on("systemctl", CommandOutput::failed("inactive"));
        assert!(!is_service_running(&inactive, &config, ServiceName::NginxProxy));
    }

    #[test]
    fn test_status_line_matches_bootstrap_marker() {
        assert!(reports_running(&status_line(ServiceName::Mysql, true)));
        assert!(!reports_running(&status_line(ServiceName::Mysql, false)));
    }
}
