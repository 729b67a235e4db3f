//! # Ploy Template System
//!
//! File: cli/src/core/templating.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Two kinds of text are generated by Ploy:
//!
//! - **Compose templates** fetched from the template repository. These use
//!   shell-style `${KEY}` placeholders so the same files stay usable with
//!   `docker compose --env-file`. `substitute_placeholders` fills them in.
//! - **nginx virtual-host blocks**, which Ploy owns entirely. They are
//!   rendered with Tera (`render_inline`) from a template compiled into the binary.
//!
//! ## Substitution rules
//!
//! - Every occurrence of `${KEY}` is replaced for each key in the map.
//! - A key whose value is empty is skipped, leaving `${KEY}` intact. Optional
//!   fields that were never supplied must not blank out the template.
//! - Placeholders for keys absent from the map are left verbatim.
//! - Values are inserted literally; no YAML quoting or escaping happens here.
//!   Callers pass values that are already safe for the target format. A value
//!   that itself contains `${OTHER}` is copied as-is, never expanded.
//!
//! ## Examples
//!
//! ```rust
//! let mut vars = TemplateVars::new();
//! vars.insert("PHP_VERSION".to_string(), "8.3".to_string());
//! let out = templating::substitute_placeholders("image: wordpress:php${PHP_VERSION}", &vars);
//! assert_eq!(out, "image: wordpress:php8.3");
//! ```
//!
use crate::core::error::{PloyError, Result};
use anyhow::anyhow;
use std::collections::BTreeMap;
use tera::Tera;
use tracing::{debug, trace};

/// Ordered key/value map used for `${KEY}` substitution.
pub type TemplateVars = BTreeMap<String, String>;

/// Replaces every `${KEY}` in `template` with the mapped value.
///
/// Keys with empty values are skipped and unknown placeholders are preserved.
/// The template is scanned once, left to right; inserted values are never rescanned.
pub fn substitute_placeholders(template: &str, vars: &TemplateVars) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            rest = &rest[start..];
            break;
        };
        let key = &after[..end];
        let placeholder = &rest[start..start + 2 + end + 1];
        match vars.get(key) {
            Some(value) if !value.is_empty() => rendered.push_str(value),
            Some(_) => {
                trace!("Skipping empty value for placeholder '{}'", key);
                rendered.push_str(placeholder);
            }
            None => rendered.push_str(placeholder),
        }
        rest = &after[end + 1..];
    }
    rendered.push_str(rest);
    rendered
}

/// Lists the `${KEY}` placeholders still present in `text`, in order of first appearance.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                let is_key = !key.is_empty()
                    && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if is_key && !found.iter().any(|k| k == key) {
                    found.push(key.to_string());
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    found
}

/// Renders a Tera template held in memory. Autoescaping is off: the output is config text, not HTML.
pub fn render_inline(template: &str, context_map: &BTreeMap<&str, String>) -> Result<String> {
    let context = tera::Context::from_serialize(context_map).map_err(|e| {
        anyhow!(PloyError::Template { source: e }).context("Failed to build template context")
    })?;
    let rendered = Tera::one_off(template, &context, false)
        .map_err(|e| anyhow!(PloyError::Template { source: e }).context("Template rendering failed"))?;
    debug!("Rendered inline template ({} bytes)", rendered.len());
    Ok(rendered)
}
