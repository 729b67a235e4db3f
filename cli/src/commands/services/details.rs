//! # Ploy Service Details
//!
//! File: cli/src/commands/services/details.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! `ploy services details <service>` prints `Host`, `Port`, `Database`,
//! `User`, and `Password` for a running service, one `Key: value` per line,
//! or a JSON object with `--json`.
//!
use crate::common::docker::inspect::{self, ServiceDetails};
use crate::common::process::SystemRunner;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct DetailsArgs {
    /// Service name (currently only `mysql`).
    service: String,

    /// Print the details as JSON.
    #[arg(long)]
    json: bool,
}

pub fn format_details(details: &ServiceDetails, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(details).context("Failed to encode service details");
    }
    Ok(details
        .pairs()
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn handle_details(args: DetailsArgs) -> Result<()> {
    let details = inspect::service_details(&SystemRunner, &args.service)
        .with_context(|| format!("Error getting {} details", args.service))?;
    println!("{}", format_details(&details, args.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServiceDetails {
        ServiceDetails {
            host: "172.17.0.2".into(),
            port: "3306".into(),
            database: "wordpress".into(),
            user: "wp_user".into(),
            password: "pw".into(),
        }
    }

    #[test]
    fn test_format_plain() -> Result<()> {
        assert_eq!(
            format_details(&sample(), false)?,
            "Host: 172.17.0.2\nPort: 3306\nDatabase: wordpress\nUser: wp_user\nPassword: pw"
        );
        Ok(())
    }

    #[test]
    fn test_format_json() -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(&format_details(&sample(), true)?)?;
        assert_eq!(value["host"], "172.17.0.2");
        assert_eq!(value["database"], "wordpress");
        Ok(())
    }
}
