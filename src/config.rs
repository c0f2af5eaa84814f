//! Environment-derived settings.
//!
//! The CLI exposes a single flag (`--num-monsters`); everything else about a
//! run (where to fetch from, where to write, how wide to fan out, how to treat
//! per-item failures) comes from `MONSTER_*` environment variables so the
//! public interface stays stable as knobs are added.

use crate::client::DEFAULT_API_BASE_URL;
use crate::pipeline::PipelineConfig;
use crate::retry::{CATALOG_RETRY, DETAIL_RETRY};
use crate::writer::DEFAULT_OUTPUT_PATH;
use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "MONSTER_API_BASE_URL";
pub const ENV_OUTPUT_PATH: &str = "MONSTER_OUTPUT_PATH";
pub const ENV_WORKERS: &str = "MONSTER_WORKERS";
pub const ENV_ITEM_FAILURES: &str = "MONSTER_ITEM_FAILURES";
pub const ENV_RETRY_DELAY_MS: &str = "MONSTER_RETRY_DELAY_MS";
pub const ENV_SCHEMA_PATH: &str = "MONSTER_SCHEMA_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "MONSTER_HTTP_TIMEOUT_SECS";

pub const DEFAULT_SAMPLE_COUNT: usize = 5;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// What to do when a sampled monster cannot be fetched or transformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemFailurePolicy {
    /// Log the failure and leave the monster out of the output.
    #[default]
    Drop,
    /// Fail the whole run before anything is written.
    Abort,
}

impl ItemFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFailurePolicy::Drop => "drop",
            ItemFailurePolicy::Abort => "abort",
        }
    }
}

impl TryFrom<&str> for ItemFailurePolicy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "drop" => Ok(ItemFailurePolicy::Drop),
            "abort" => Ok(ItemFailurePolicy::Abort),
            other => bail!("Unknown item failure policy: {other} (expected drop|abort)"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub output_path: PathBuf,
    pub workers: usize,
    pub item_failures: ItemFailurePolicy,
    pub retry_delay: Option<Duration>,
    pub schema_path: Option<PathBuf>,
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            workers: DEFAULT_WORKERS,
            item_failures: ItemFailurePolicy::Drop,
            retry_delay: None,
            schema_path: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(url) = get(ENV_API_BASE_URL) {
            settings.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(path) = get(ENV_OUTPUT_PATH) {
            settings.output_path = PathBuf::from(path);
        }
        if let Some(raw) = get(ENV_WORKERS) {
            let workers = parse_number(&raw, ENV_WORKERS)?;
            if workers == 0 {
                bail!("{ENV_WORKERS} must be at least 1");
            }
            settings.workers = workers as usize;
        }
        if let Some(raw) = get(ENV_ITEM_FAILURES) {
            settings.item_failures = ItemFailurePolicy::try_from(raw.trim())?;
        }
        if let Some(raw) = get(ENV_RETRY_DELAY_MS) {
            settings.retry_delay = Some(Duration::from_millis(parse_number(
                &raw,
                ENV_RETRY_DELAY_MS,
            )?));
        }
        if let Some(path) = get(ENV_SCHEMA_PATH) {
            settings.schema_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = get(ENV_HTTP_TIMEOUT_SECS) {
            settings.http_timeout =
                Duration::from_secs(parse_number(&raw, ENV_HTTP_TIMEOUT_SECS)?);
        }

        Ok(settings)
    }

    /// Pipeline configuration for a run sampling `sample_count` monsters.
    pub fn pipeline_config(&self, sample_count: usize) -> PipelineConfig {
        let (catalog_retry, detail_retry) = match self.retry_delay {
            Some(delay) => (CATALOG_RETRY.with_delay(delay), DETAIL_RETRY.with_delay(delay)),
            None => (CATALOG_RETRY, DETAIL_RETRY),
        };
        PipelineConfig {
            sample_count,
            workers: self.workers,
            item_failures: self.item_failures,
            catalog_retry,
            detail_retry,
            output_path: self.output_path.clone(),
        }
    }
}

fn parse_number(raw: &str, label: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {label} as a non-negative integer"))
}
