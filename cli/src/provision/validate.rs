//! # Ploy Site Input Validation
//!
//! File: cli/src/provision/validate.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! Pure checks on a fully-prompted `SiteRequest`. The first failing rule wins.
//!
//! `validate_domain` also runs on its own before the proxy config is written,
//! because the domain becomes a file name under the nginx root and the
//! `server_name` of the generated block.
//!
use crate::core::error::{PloyError, Result};
use crate::provision::site::{DbSource, ScalingType, SiteRequest, SiteType};
use anyhow::anyhow;

fn invalid(message: &str) -> anyhow::Error {
    anyhow!(PloyError::Validation(message.to_string()))
}

const MAX_DOMAIN_LEN: usize = 253;

/// Accepts only hostname characters (`A-Z a-z 0-9 . -`) in dot-separated, non-empty labels.
pub fn validate_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(invalid("domain is required"));
    }
    let well_formed = domain.len() <= MAX_DOMAIN_LEN
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && domain
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'));
    if !well_formed {
        return Err(anyhow!(PloyError::Validation(format!(
            "invalid domain '{}'",
            domain
        ))));
    }
    Ok(())
}

pub fn validate_inputs(req: &SiteRequest) -> Result<()> {
    if !SiteType::VALUES.contains(&req.site_type.as_str()) {
        return Err(invalid("invalid site type"));
    }
    validate_domain(&req.domain)?;
    if !DbSource::VALUES.contains(&req.db_source.as_str()) {
        return Err(invalid("invalid database source"));
    }
    if !ScalingType::VALUES.contains(&req.scaling_type.as_str()) {
        return Err(invalid("invalid scaling type"));
    }
    if req.replicas < 1 {
        return Err(invalid("replicas must be at least 1"));
    }
    if req.scaling_type == ScalingType::Dynamic.as_str() && req.max_replicas < req.replicas {
        return Err(invalid(
            "max_replicas must be greater than or equal to replicas",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SiteRequest {
        SiteRequest {
            site_type: "wp".into(),
            domain: "example.com".into(),
            db_source: "internal".into(),
            scaling_type: "static".into(),
            replicas: 1,
            max_replicas: 0,
            ..Default::default()
        }
    }

    fn message(req: &SiteRequest) -> String {
        match validate_inputs(req) {
            Ok(()) => String::new(),
            Err(e) => match e.downcast_ref::<PloyError>() {
                Some(PloyError::Validation(m)) => m.clone(),
                _ => panic!("unexpected error kind: {e}"),
            },
        }
    }

    #[test]
    fn test_valid_static_site() {
        assert!(validate_inputs(&valid()).is_ok());
    }

    #[test]
    fn test_each_rule() {
        let cases: Vec<(fn(&mut SiteRequest), &str)> = vec![
            (|r| r.site_type = "drupal".into(), "invalid site type"),
            (|r| r.domain.clear(), "domain is required"),
            (|r| r.db_source = "cloud".into(), "invalid database source"),
            (|r| r.scaling_type = "auto".into(), "invalid scaling type"),
            (|r| r.replicas = 0, "replicas must be at least 1"),
            (
                |r| {
                    r.scaling_type = "dynamic".into();
                    r.replicas = 2;
                    r.max_replicas = 1;
                },
                "max_replicas must be greater than or equal to replicas",
            ),
        ];
        for (mutate, expected) in cases {
            let mut req = valid();
            mutate(&mut req);
            assert_eq!(message(&req), expected);
        }
    }

    #[test]
    fn test_domain_accepts_hostnames() {
        for domain in ["example.com", "host.example.com.localhost", "a-b.c0.io", "localhost"] {
            assert!(validate_domain(domain).is_ok(), "{domain}");
        }
    }

    #[test]
    fn test_domain_rejects_paths_and_directives() {
        for domain in [
            "../../escaped",
            "a.com; include /etc/shadow",
            "a.com/x",
            ".example.com",
            "example..com",
            "-bad.com",
            "sp ace.com",
            "uni\u{e9}.com",
        ] {
            let mut req = valid();
            req.domain = domain.into();
            assert_eq!(message(&req), format!("invalid domain '{domain}'"));
        }
        assert!(validate_domain(&"a".repeat(254)).is_err());
    }

    #[test]
    fn test_dynamic_with_equal_bounds_is_valid() {
        let mut req = valid();
        req.scaling_type = "dynamic".into();
        req.replicas = 3;
        req.max_replicas = 3;
        assert!(validate_inputs(&req).is_ok());
    }

    #[test]
    fn test_static_ignores_max_replicas() {
        let mut req = valid();
        req.replicas = 5;
        req.max_replicas = 0;
        assert!(validate_inputs(&req).is_ok());
    }
}
