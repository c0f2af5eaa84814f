//! Remote monster source.
//!
//! `MonsterSource` is the seam between the orchestrator and the network: the
//! production `HttpMonsterClient` talks to the D&D 5e API over blocking
//! reqwest, while tests substitute in-memory sources. Neither method retries;
//! retry budgets are applied by the caller.

use crate::error::PipelineError;
use crate::model::{CatalogEntry, CatalogPage, RawDetail};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_API_BASE_URL: &str = "https://www.dnd5eapi.co";
pub const CATALOG_PATH: &str = "/api/monsters";

pub trait MonsterSource: Send + Sync {
    fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, PipelineError>;

    fn fetch_detail(&self, reference: &str) -> Result<RawDetail, PipelineError>;
}

pub struct HttpMonsterClient {
    client: Client,
    base_url: String,
}

impl HttpMonsterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a catalog reference against the base URL.
    pub fn url_for(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else if reference.starts_with('/') {
            format!("{}{reference}", self.base_url)
        } else {
            format!("{}/{reference}", self.base_url)
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, PipelineError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| PipelineError::RemoteFetch {
                url: url.to_string(),
                status: err.status().map(|s| s.as_u16()),
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::RemoteFetch {
                url: url.to_string(),
                status: Some(status.as_u16()),
                reason: format!("HTTP status {status}"),
            });
        }

        response.json::<T>().map_err(|err| PipelineError::RemoteFetch {
            url: url.to_string(),
            status: None,
            reason: format!("decoding response body: {err}"),
        })
    }
}

impl MonsterSource for HttpMonsterClient {
    fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, PipelineError> {
        let url = self.url_for(CATALOG_PATH);
        let page: CatalogPage = self.get_json(&url)?;
        Ok(page.results)
    }

    fn fetch_detail(&self, reference: &str) -> Result<RawDetail, PipelineError> {
        let url = self.url_for(reference);
        let body: Value = self.get_json(&url).inspect_err(|err| {
            if let Some(status) = err.status() {
                error!("HTTP error fetching {reference}: status {status}");
            }
        })?;
        match body {
            Value::Object(detail) => Ok(detail),
            other => Err(PipelineError::RemoteFetch {
                url,
                status: None,
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
