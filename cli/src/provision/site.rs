//! # Ploy Site Model
//!
//! File: cli/src/provision/site.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! A site exists only as files on disk: a compose file under
//! `<sites_dir>/<hostname>/` and a deploy log under
//! `<log_dir>/sites/<hostname>/`. This module holds the in-flight
//! representation used while creating one.
//!
//! - **`SiteRequest`**: Raw, possibly incomplete parameters from flags and prompts.
//!   Enumerated fields are still strings here so validation can report bad values.
//! - **`Site`**: A validated request with typed `SiteType`, `ScalingType`, and `DbSource`.
//!
use crate::common::docker::inspect::ServiceDetails;
use crate::core::error::{PloyError, Result};
use crate::core::templating::TemplateVars;
use anyhow::anyhow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_PHP_VERSION: &str = "8.3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteType {
    Wp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingType {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbSource {
    Internal,
    External,
}

impl SiteType {
    pub const VALUES: [&'static str; 1] = ["wp"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteType::Wp => "wp",
        }
    }
}

impl ScalingType {
    pub const VALUES: [&'static str; 2] = ["static", "dynamic"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalingType::Static => "static",
            ScalingType::Dynamic => "dynamic",
        }
    }

    /// Relative template path under the template base URL.
    pub fn template_name(&self) -> &'static str {
        match self {
            ScalingType::Static => "wp/wp-compose-static.yml",
            ScalingType::Dynamic => "wp/wp-compose-dynamic.yml",
        }
    }
}

impl DbSource {
    pub const VALUES: [&'static str; 2] = ["internal", "external"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DbSource::Internal => "internal",
            DbSource::External => "external",
        }
    }
}

impl FromStr for SiteType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wp" => Ok(SiteType::Wp),
            _ => Err(anyhow!(PloyError::Validation("invalid site type".into()))),
        }
    }
}

impl FromStr for ScalingType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "static" => Ok(ScalingType::Static),
            "dynamic" => Ok(ScalingType::Dynamic),
            _ => Err(anyhow!(PloyError::Validation("invalid scaling type".into()))),
        }
    }
}

impl FromStr for DbSource {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "internal" => Ok(DbSource::Internal),
            "external" => Ok(DbSource::External),
            _ => Err(anyhow!(PloyError::Validation(
                "invalid database source".into()
            ))),
        }
    }
}

impl fmt::Display for ScalingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DbSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection settings written into the site's compose file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbCredentials {
    pub host: String,
    pub port: String,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl From<ServiceDetails> for DbCredentials {
    fn from(d: ServiceDetails) -> Self {
        Self {
            host: d.host,
            port: d.port,
            name: d.database,
            user: d.user,
            password: d.password,
        }
    }
}

/// Site parameters as collected from the command line and prompts.
#[derive(Debug, Clone, Default)]
pub struct SiteRequest {
    pub site_type: String,
    pub hostname: String,
    pub domain: String,
    pub site_id: String,
    pub php_version: String,
    pub db_source: String,
    pub db: DbCredentials,
    pub scaling_type: String,
    pub replicas: u32,
    pub max_replicas: u32,
}

/// A validated site ready to be materialized.
#[derive(Debug, Clone)]
pub struct Site {
    pub site_type: SiteType,
    pub hostname: String,
    pub domain: String,
    pub site_id: String,
    pub php_version: String,
    pub db_source: DbSource,
    pub db: DbCredentials,
    pub scaling: ScalingType,
    pub replicas: u32,
    pub max_replicas: u32,
}

impl Site {
    /// Converts a request whose fields already passed `validate_inputs`.
    pub fn from_request(req: SiteRequest) -> Result<Self> {
        Ok(Self {
            site_type: req.site_type.parse()?,
            db_source: req.db_source.parse()?,
            scaling: req.scaling_type.parse()?,
            hostname: req.hostname,
            domain: req.domain,
            site_id: req.site_id,
            php_version: req.php_version,
            db: req.db,
            replicas: req.replicas,
            max_replicas: req.max_replicas,
        })
    }

    pub fn compose_file_name(&self) -> String {
        compose_file_name(&self.php_version)
    }

    /// Values substituted into the compose template.
    pub fn template_vars(&self) -> TemplateVars {
        let pairs = [
            ("DOMAIN", self.domain.clone()),
            ("HOSTNAME", self.hostname.clone()),
            ("SITE_ID", self.site_id.clone()),
            ("PHP_VERSION", self.php_version.clone()),
            ("DB_HOST", self.db.host.clone()),
            ("DB_PORT", self.db.port.clone()),
            ("DB_NAME", self.db.name.clone()),
            ("DB_USER", self.db.user.clone()),
            ("DB_PASSWORD", self.db.password.clone()),
            ("REPLICAS", self.replicas.to_string()),
            ("MAX_REPLICAS", self.max_replicas.to_string()),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

pub fn default_domain(hostname: &str) -> String {
    format!("{}.localhost", hostname)
}

pub fn compose_file_name(php_version: &str) -> String {
    format!("docker-compose-wp-php{}.yml", php_version)
}

pub fn site_dir(sites_dir: &Path, hostname: &str) -> PathBuf {
    sites_dir.join(hostname)
}
