//! # Ploy CLI WP-CLI Passthrough Integration Tests
//!
//! File: cli/tests/wp.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_wp_without_compose_file_fails() {
    let env = TestEnv::new();
    let dir = env.mkdir("not-a-site/deeper");
    env.cmd()
        .current_dir(&dir)
        .args(["wp", "plugin", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No docker-compose file found"));
}
