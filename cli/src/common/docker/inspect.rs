//! # Ploy Docker Inspection
//!
//! File: cli/src/common/docker/inspect.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Extracts connection details for a running dependency container by
//! parsing the text output of `docker ps` and `docker inspect --format`.
//! The result is ephemeral and never written to disk.
//!
//! For MySQL:
//! 1. `docker ps --filter name=mysql --format {{.Names}}` finds the container.
//! 2. The container environment provides `MYSQL_USER` with `MYSQL_PASSWORD`
//!    (User, Password) and `MYSQL_DATABASE` (Database, default `wordpress`).
//!    Without an application user the pair is `root` with `MYSQL_ROOT_PASSWORD`.
//! 3. The network settings provide the IP address (Host).
//! 4. Port is the port MySQL listens on inside the container (`3306`), since
//!    Host is the container address. The host-published port does not apply there.
//!
use crate::common::process::CommandRunner;
use crate::core::error::{PloyError, Result};
use anyhow::{anyhow, Context};
use serde::Serialize;
use tracing::debug;

const ENV_FORMAT: &str = "{{range .Config.Env}}{{println .}}{{end}}";
const IP_FORMAT: &str = "{{range .NetworkSettings.Networks}}{{.IPAddress}}{{end}}";
const MYSQL_CONTAINER_PORT: &str = "3306";
const MYSQL_ROOT_USER: &str = "root";
const DEFAULT_DATABASE: &str = "wordpress";

/// Connection details for a dependency service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceDetails {
    pub host: String,
    pub port: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ServiceDetails {
    /// Label/value pairs for display, in a stable order.
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("Host", self.host.as_str()),
            ("Port", self.port.as_str()),
            ("Database", self.database.as_str()),
            ("User", self.user.as_str()),
            ("Password", self.password.as_str()),
        ]
    }
}

/// Fills database/user/password from `KEY=VALUE` lines of a MySQL container environment.
///
/// User and password always come from the same account.
pub fn apply_mysql_env(details: &mut ServiceDetails, env_listing: &str) {
    let mut user = None;
    let mut password = None;
    let mut root_password = None;
    for line in env_listing.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "MYSQL_USER" => user = Some(value),
            "MYSQL_PASSWORD" => password = Some(value),
            "MYSQL_ROOT_PASSWORD" => root_password = Some(value),
            "MYSQL_DATABASE" => details.database = value.to_string(),
            _ => {}
        }
    }
    match (user, password) {
        (Some(user), Some(password)) if !user.is_empty() => {
            details.user = user.to_string();
            details.password = password.to_string();
        }
        _ => {
            details.user = MYSQL_ROOT_USER.to_string();
            details.password = root_password.unwrap_or_default().to_string();
        }
    }
    if details.database.is_empty() {
        details.database = DEFAULT_DATABASE.to_string();
    }
}

/// Name of the first running container whose name matches `filter`, if any.
pub fn running_container(runner: &dyn CommandRunner, filter: &str) -> Result<Option<String>> {
    let name_filter = format!("name={}", filter);
    let out = runner.output(
        "docker",
        &["ps", "--filter", &name_filter, "--format", "{{.Names}}"],
    )?;
    if !out.success {
        return Ok(None);
    }
    Ok(out
        .stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string))
}

fn inspect(runner: &dyn CommandRunner, format: &str, container: &str) -> Result<String> {
    let args = ["inspect", "--format", format, container];
    let out = runner.output("docker", &args)?.into_result("docker", &args)?;
    Ok(out.stdout)
}

/// Reads MySQL connection details from the running MySQL container.
pub fn mysql_details(runner: &dyn CommandRunner) -> Result<ServiceDetails> {
    let container = running_container(runner, "mysql")?.ok_or_else(|| {
        anyhow!(PloyError::ServiceUnavailable {
            service: "mysql".into(),
            reason: "MySQL container is not running".into(),
        })
    })?;
    debug!("Inspecting MySQL container '{}'", container);

    let mut details = ServiceDetails::default();
    let env = inspect(runner, ENV_FORMAT, &container)
        .context("Failed to inspect MySQL container")?;
    apply_mysql_env(&mut details, &env);
    details.host = inspect(runner, IP_FORMAT, &container)
        .context("Failed to get MySQL container IP")?
        .trim()
        .to_string();
    details.port = MYSQL_CONTAINER_PORT.to_string();
    Ok(details)
}

/// Looks up details for a named service.
pub fn service_details(runner: &dyn CommandRunner, service: &str) -> Result<ServiceDetails> {
    match service {
        "mysql" => mysql_details(runner),
        other => Err(anyhow!(PloyError::Validation(format!(
            "unsupported service: {}",
            other
        )))),
    }
}

#[cfg(test)]
pub mod testing {
    //! Canned `docker` answers for a running MySQL container.
    use crate::common::process::testing::ScriptedRunner;
    use crate::common::process::CommandOutput;

    pub fn with_running_mysql(runner: ScriptedRunner) -> ScriptedRunner {
        runner
            .on("docker ps --filter name=mysql", CommandOutput::ok("mysql-container\n"))
            .on(
                "docker inspect --format {{range .Config.Env}}",
                CommandOutput::ok(
                    "MYSQL_ROOT_PASSWORD=root_secret\nMYSQL_USER=wp_user\nMYSQL_PASSWORD=wp_password\nMYSQL_DATABASE=wordpress\nPATH=/usr/bin\n",
                ),
            )
            .on(
                "docker inspect --format {{range .NetworkSettings.Networks}}",
                CommandOutput::ok("172.17.0.2\n"),
            )
    }
}
