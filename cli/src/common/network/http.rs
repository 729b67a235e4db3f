//! # Ploy HTTP Utilities (`common::network::http`)
//!
//! File: cli/src/common/network/http.rs
//! Author: Ploy Contributors
//! Repository: https://github.com/ploycloud/ploy-server-cli
//!
//! ## Overview
//!
//! Ploy makes exactly two kinds of HTTP requests:
//!
//! - **Template fetch**: `GET <base_url><name>` for a compose template such as
//!   `wp/wp-compose-static.yml`. Templates are fetched fresh on every run;
//!   there is no cache, no local fallback, and no signature check. Network
//!   failures and non-200 responses become `PloyError::Fetch`.
//! - **Webhook notification**: `POST <url>` with `{"message": "..."}`.
//!   Delivery failures are logged as warnings and never abort provisioning.
//!
//! The fetch side sits behind the `TemplateSource` trait so the provisioning
//! workflow can be exercised without a network.
//!
use crate::common::ui;
use crate::core::error::{PloyError, Result};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("ploy/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies compose template content by relative name.
pub trait TemplateSource {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| anyhow!(PloyError::Http { source: e }))
        .context("Failed to build HTTP client")
}

/// Fetches templates from a remote base URL.
#[derive(Debug, Clone)]
pub struct HttpTemplateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.to_string(),
        })
    }

    /// Joins the base URL and a relative template name with exactly one slash.
    pub fn url_for(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }
}

impl TemplateSource for HttpTemplateSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.url_for(name);
        debug!("Fetching template {}", url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            anyhow!(PloyError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            })
        })?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(anyhow!(PloyError::Fetch {
                url,
                reason: format!("status code {}", status.as_u16()),
            }));
        }
        let body = response.bytes().await.map_err(|e| {
            anyhow!(PloyError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            })
        })?;
        info!("Fetched template {} ({} bytes)", name, body.len());
        Ok(body.to_vec())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    message: &'a str,
}

/// Posts progress messages to a caller-supplied URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: url.to_string(),
        })
    }

    /// Sends `message`. Failures are reported as warnings only.
    pub async fn notify(&self, message: &str) {
        let result = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { message })
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                debug!("Webhook delivered: {}", message);
            }
            Ok(resp) => {
                warn!("Webhook {} answered {}", self.url, resp.status());
                ui::warning(&format!(
                    "Webhook returned status {}",
                    resp.status().as_u16()
                ));
            }
            Err(e) => {
                warn!("Failed to send webhook to {}: {}", self.url, e);
                ui::warning(&format!("Failed to send webhook: {}", e));
            }
        }
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory `TemplateSource` for unit tests.
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct StaticTemplates {
        templates: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticTemplates {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, name: &str, content: &str) -> Self {
            self.templates.insert(name.to_string(), content.to_string());
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl TemplateSource for StaticTemplates {
        async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
            self.requested.lock().unwrap().push(name.to_string());
            self.templates
                .get(name)
                .map(|t| t.as_bytes().to_vec())
                .ok_or_else(|| {
                    anyhow!(PloyError::Fetch {
                        url: name.to_string(),
                        reason: "status code 404".to_string(),
                    })
                })
        }
    }
}
