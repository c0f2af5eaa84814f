//! Daily monster sampler.
//!
//! Fetches the monster catalog from the D&D 5e API, picks a date-seeded
//! sample, pulls each sampled monster's details, reduces them to the fields we
//! keep, gates them through a JSON schema, and writes the survivors as a JSON
//! array.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod retry;
pub mod sampler;
pub mod schema_gate;
pub mod transform;
pub mod writer;

pub use client::{CATALOG_PATH, DEFAULT_API_BASE_URL, HttpMonsterClient, MonsterSource};
pub use config::{DEFAULT_SAMPLE_COUNT, ItemFailurePolicy, Settings};
pub use error::PipelineError;
pub use model::{ActionRecord, CatalogEntry, MonsterRecord, RawDetail};
pub use pipeline::{ItemFailure, ItemOutcome, Pipeline, PipelineConfig, RunReport};
pub use retry::{CATALOG_RETRY, DETAIL_RETRY, RetryPolicy, retry};
pub use sampler::{sample, seed_key_for, today_seed_key};
pub use schema_gate::{MonsterSchema, Rejection, Validation};
pub use transform::transform;
pub use writer::{DEFAULT_OUTPUT_PATH, write_records};

use anyhow::{Context, Result};

/// Compile the schema named by `settings`, falling back to the bundled one.
pub fn schema_for(settings: &Settings) -> Result<MonsterSchema> {
    match &settings.schema_path {
        Some(path) => MonsterSchema::load(path)
            .with_context(|| format!("loading schema override {}", path.display())),
        None => MonsterSchema::embedded(),
    }
}

/// Wire an HTTP-backed pipeline from settings.
pub fn http_pipeline(
    settings: &Settings,
    sample_count: usize,
) -> Result<Pipeline<HttpMonsterClient>> {
    let client = HttpMonsterClient::new(&settings.api_base_url, settings.http_timeout)?;
    let schema = schema_for(settings)?;
    Ok(Pipeline::new(
        client,
        schema,
        settings.pipeline_config(sample_count),
    ))
}
