//! # Ploy CLI Sites Integration Tests
//!
//! File: cli/tests/sites.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! `ploy sites ...` against a temporary installation in test mode. No test
//! here needs Docker: the failures are reached before any container work,
//! and lifecycle tests use directories without compose files.
//!
mod common;
use common::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_sites_new_rejects_bad_hostname() {
    let env = TestEnv::new();
    env.cmd()
        .args(["sites", "new", "--non-interactive", "--hostname", "../etc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid hostname"));
}

#[test]
fn test_sites_new_requires_hostname_non_interactive() {
    let env = TestEnv::new();
    env.cmd()
        .args(["sites", "new", "--non-interactive"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("hostname is required"));
}

#[cfg(unix)]
#[test]
fn test_sites_new_validation_failure_keeps_proxy_config() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "sites",
            "new",
            "--non-interactive",
            "--hostname",
            "demo",
            "--type",
            "drupal",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid site type"));

    // The proxy stage ran before validation and is not rolled back.
    let conf = env.path("nginx/sites-available/demo.localhost.conf");
    let content = fs::read_to_string(&conf).expect("proxy config should exist");
    assert!(content.contains("server_name demo.localhost;"));
    assert_eq!(
        fs::read_link(env.path("nginx/sites-enabled/demo.localhost.conf")).unwrap(),
        conf
    );

    let log = fs::read_to_string(env.path("logs/sites/demo/deploy.log")).unwrap();
    assert!(log.contains("Starting site creation process"));
    assert!(log.contains("Validation failed"));
}

#[test]
fn test_sites_new_rejects_unsafe_domain() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "sites",
            "new",
            "--non-interactive",
            "--hostname",
            "demo",
            "--domain",
            "a.com; include /etc/shadow",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid domain"));

    assert!(!env.path("nginx/sites-available").exists());
}

#[test]
fn test_sites_start_with_no_sites() {
    let env = TestEnv::new();
    env.mkdir("sites/empty-site");
    env.cmd()
        .args(["sites", "start"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sites found to start."));
}

#[test]
fn test_sites_stop_missing_sites_dir_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["sites", "stop"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}
