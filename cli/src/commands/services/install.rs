//! # Ploy Service Installers
//!
//! File: cli/src/commands/services/install.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! - **`install mysql`**: Fetches `databases/mysql-compose.yml`, fills in
//!   `MYSQL_USER`, `MYSQL_PASSWORD`, `MYSQL_PORT`, and `MYSQL_ROOT_PASSWORD`,
//!   writes `<services_dir>/database/mysql/docker-compose.yml`, then runs
//!   `docker compose up -d` on it. Credentials always come from flags (with
//!   defaults), never from the template itself.
//! - **`install nginx-proxy`**: Installs and enables the distribution nginx
//!   through the privileged path (`apt-get`, `systemctl`). Skipped when
//!   `nginx -v` already works; not supported on macOS.
//!
//! In test mode neither installer starts containers or touches packages.
//!
use crate::common::docker::compose::run_compose;
use crate::common::fs::io;
use crate::common::fs::privileged::{self, PrivilegedFs};
use crate::common::network::http::{HttpTemplateSource, TemplateSource};
use crate::common::process::{CommandRunner, SystemRunner};
use crate::common::ui;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::core::templating::{substitute_placeholders, TemplateVars};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

const MYSQL_TEMPLATE: &str = "databases/mysql-compose.yml";

#[derive(Parser, Debug)]
pub struct InstallArgs {
    #[command(subcommand)]
    target: InstallTarget,
}

#[derive(Subcommand, Debug)]
enum InstallTarget {
    /// Install the MySQL service container.
    Mysql(MysqlArgs),
    /// Install nginx on the host as the reverse proxy.
    NginxProxy,
}

#[derive(Parser, Debug, Clone)]
pub struct MysqlArgs {
    #[arg(long, default_value = "default_user")]
    user: String,
    #[arg(long, default_value = "default_password")]
    password: String,
    #[arg(long, default_value = "3306")]
    port: String,
    #[arg(long, default_value = "default_root_password")]
    root_password: String,
}

impl MysqlArgs {
    fn template_vars(&self) -> TemplateVars {
        [
            ("MYSQL_USER", &self.user),
            ("MYSQL_PASSWORD", &self.password),
            ("MYSQL_PORT", &self.port),
            ("MYSQL_ROOT_PASSWORD", &self.root_password),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }
}

/// Materializes the MySQL compose file and starts it. Returns the file path.
pub async fn install_mysql<T: TemplateSource>(
    config: &Config,
    runner: &dyn CommandRunner,
    templates: &T,
    args: &MysqlArgs,
) -> Result<PathBuf> {
    println!("Installing MySQL service...");
    let raw = templates.fetch(MYSQL_TEMPLATE).await?;
    let text = String::from_utf8(raw).context("MySQL template is not UTF-8")?;
    let content = substitute_placeholders(&text, &args.template_vars());

    let compose_file = config.mysql_dir().join("docker-compose.yml");
    io::write_string_to_file(&compose_file, &content)
        .context("Failed to write MySQL compose file")?;

    if config.test_mode {
        info!("Test mode: not starting MySQL");
    } else {
        run_compose(runner, &compose_file, &["up", "-d"]).context("Failed to start MySQL")?;
    }
    ui::success("MySQL installed successfully");
    Ok(compose_file)
}

pub fn install_nginx_proxy(config: &Config, runner: &dyn CommandRunner, fs: &dyn PrivilegedFs) -> Result<()> {
    if cfg!(target_os = "macos") {
        println!("Nginx installation is not supported on macOS. Please install Nginx manually.");
        return Ok(());
    }
    if config.test_mode {
        info!("Test mode: skipping nginx installation");
        println!("Test mode: skipping nginx installation");
        return Ok(());
    }

    println!("Checking if Nginx is already installed...");
    if runner.output("nginx", &["-v"]).is_ok_and(|out| out.success) {
        println!("Nginx is already installed.");
        return Ok(());
    }

    println!("Installing Nginx as a proxy...");
    let service = config.proxy.service_name.as_str();
    fs.run("apt-get", &["update"]).context("Error updating package lists")?;
    fs.run("apt-get", &["install", "-y", "nginx"]).context("Error installing Nginx")?;
    fs.run("systemctl", &["start", service]).context("Error starting Nginx service")?;
    fs.run("systemctl", &["enable", service]).context("Error enabling Nginx service")?;
    ui::success("Nginx installed and configured successfully as a proxy");
    Ok(())
}

pub async fn handle_install(args: InstallArgs) -> Result<()> {
    let config = config::load_config()?;
    let runner = SystemRunner;
    match args.target {
        InstallTarget::Mysql(mysql) => {
            let templates = HttpTemplateSource::new(&config.templates.base_url)?;
            install_mysql(&config, &runner, &templates, &mysql)
                .await
                .context("Error installing MySQL")?;
        }
        InstallTarget::NginxProxy => {
            let fs = privileged::from_config(&config, &runner);
            install_nginx_proxy(&config, &runner, fs.as_ref())?;
        }
    }
    Ok(())
}
