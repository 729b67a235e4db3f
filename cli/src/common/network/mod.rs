//! # Ploy Network Utilities Module (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Outbound HTTP used by the CLI: compose template retrieval and webhook
//! progress notifications. See `http` for details.
//!

/// Template fetching (`TemplateSource`, `HttpTemplateSource`) and webhooks (`WebhookNotifier`).
pub mod http;
