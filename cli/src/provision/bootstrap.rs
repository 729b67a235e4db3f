//! # Ploy Service Bootstrapper
//!
//! File: cli/src/provision/bootstrap.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Makes sure a dependency service (`mysql`, `nginx-proxy`) is up before a
//! site is launched. Ploy asks itself, so the probe and the installer are the
//! same code paths an operator gets from the CLI:
//!
//! - probe: `<ploy> services status <service>`, looking for `<service> is running`
//! - install: `<ploy> services install <service>`, streamed to the terminal
//!
//! By default the install is attempted once and assumed to have worked if it
//! exits zero; the service is not probed again. With
//! `[bootstrap] verify_after_install = true` the service is re-probed after
//! each install, up to `max_attempts` installs.
//!
use crate::common::process::CommandRunner;
use crate::core::config::BootstrapConfig;
use crate::core::error::{PloyError, Result};
use anyhow::{anyhow, Context};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyRunning,
    Installed { attempts: u32 },
}

/// True when `ploy services status` output reports the service as running.
pub fn reports_running(output: &str) -> bool {
    output
        .lines()
        .map(str::trim)
        .any(|line| line.ends_with(" is running"))
}

pub struct ServiceBootstrapper<'a> {
    runner: &'a dyn CommandRunner,
    ploy_bin: String,
    policy: BootstrapConfig,
}

impl<'a> ServiceBootstrapper<'a> {
    pub fn new(runner: &'a dyn CommandRunner, ploy_bin: impl Into<String>, policy: &BootstrapConfig) -> Self {
        Self {
            runner,
            ploy_bin: ploy_bin.into(),
            policy: policy.clone(),
        }
    }

    pub fn is_running(&self, service: &str) -> Result<bool> {
        let out = self
            .runner
            .output(&self.ploy_bin, &["services", "status", service])?;
        let running = out.success && reports_running(&out.stdout);
        debug!("Probe for {}: running={}", service, running);
        Ok(running)
    }

    fn install(&self, service: &str) -> Result<()> {
        info!("Installing {}", service);
        self.runner
            .stream(&self.ploy_bin, &["services", "install", service])
            .with_context(|| format!("Failed to install {}", service))
    }

    /// Probes `service` and installs it if it is not running.
    pub fn ensure(&self, service: &str) -> Result<BootstrapOutcome> {
        if self.is_running(service)? {
            info!("{} is already running", service);
            return Ok(BootstrapOutcome::AlreadyRunning);
        }

        if !self.policy.verify_after_install {
            self.install(service)?;
            return Ok(BootstrapOutcome::Installed { attempts: 1 });
        }

        for attempt in 1..=self.policy.max_attempts {
            self.install(service)?;
            if self.is_running(service)? {
                return Ok(BootstrapOutcome::Installed { attempts: attempt });
            }
            warn!(
                "{} still not running after install attempt {}/{}",
                service, attempt, self.policy.max_attempts
            );
        }
        Err(anyhow!(PloyError::ServiceUnavailable {
            service: service.to_string(),
            reason: format!(
                "not running after {} install attempt(s)",
                self.policy.max_attempts
            ),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::testing::ScriptedRunner;
    use crate::common::process::CommandOutput;

    fn down(runner: ScriptedRunner, service: &str) -> ScriptedRunner {
        runner.on(
            &format!("ploy services status {}", service),
            CommandOutput::ok(format!("{} is not running\n", service)),
        )
    }

    fn up(runner: ScriptedRunner, service: &str) -> ScriptedRunner {
        runner.on(
            &format!("ploy services status {}", service),
            CommandOutput::ok(format!("{} is running\n", service)),
        )
    }

    #[test]
    fn test_reports_running() {
        assert!(reports_running("mysql is running\n"));
        assert!(!reports_running("mysql is not running\n"));
        assert!(!reports_running(""));
    }

    #[test]
    fn test_down_service_installs_exactly_once() -> Result<()> {
        let runner = down(ScriptedRunner::new(), "mysql");
        let b = ServiceBootstrapper::new(&runner, "ploy", &BootstrapConfig::default());
        assert_eq!(b.ensure("mysql")?, BootstrapOutcome::Installed { attempts: 1 });
        assert_eq!(runner.count("ploy services install mysql"), 1);
        // No re-probe under the default policy.
        assert_eq!(runner.count("ploy services status mysql"), 1);
        Ok(())
    }

    #[test]
    fn test_running_service_is_not_installed() -> Result<()> {
        let runner = up(ScriptedRunner::new(), "mysql");
        let b = ServiceBootstrapper::new(&runner, "ploy", &BootstrapConfig::default());
        assert_eq!(b.ensure("mysql")?, BootstrapOutcome::AlreadyRunning);
        assert_eq!(runner.count("ploy services install"), 0);
        Ok(())
    }

    #[test]
    fn test_failed_probe_counts_as_down() -> Result<()> {
        let runner = ScriptedRunner::new().on(
            "ploy services status",
            CommandOutput::failed("docker: command not found"),
        );
        let b = ServiceBootstrapper::new(&runner, "ploy", &BootstrapConfig::default());
        assert!(!b.is_running("mysql")?);
        Ok(())
    }

    #[test]
    fn test_install_failure_propagates() {
        let runner = down(ScriptedRunner::new(), "nginx-proxy")
            .on("ploy services install", CommandOutput::failed("apt locked"));
        let b = ServiceBootstrapper::new(&runner, "ploy", &BootstrapConfig::default());
        let err = b.ensure("nginx-proxy").unwrap_err();
        assert!(err.to_string().contains("Failed to install nginx-proxy"));
    }

    #[test]
    fn test_verify_gives_up_after_max_attempts() {
        let runner = down(ScriptedRunner::new(), "mysql");
        let policy = BootstrapConfig {
            verify_after_install: true,
            max_attempts: 3,
        };
        let b = ServiceBootstrapper::new(&runner, "ploy", &policy);
        let err = b.ensure("mysql").unwrap_err();
        assert!(err
            .downcast_ref::<PloyError>()
            .is_some_and(|pe| matches!(pe, PloyError::ServiceUnavailable { .. })));
        assert_eq!(runner.count("ploy services install mysql"), 3);
        assert_eq!(runner.count("ploy services status mysql"), 4);
    }
}
