//! Date-seeded sampling of the monster catalog.
//!
//! The sampler never reads the clock. Callers derive a seed key once (normally
//! `today_seed_key()`) and pass it in, so every run on the same calendar day
//! selects the same monsters from an unchanged catalog.

use crate::error::PipelineError;
use crate::model::CatalogEntry;
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use sha2::{Digest, Sha256};

const SEED_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn seed_key_for(date: NaiveDate) -> String {
    date.format(SEED_KEY_FORMAT).to_string()
}

/// Seed key for the current local calendar day.
pub fn today_seed_key() -> String {
    seed_key_for(Local::now().date_naive())
}

/// Select `count` distinct entries from `catalog` without replacement.
///
/// The selection depends only on the seed key, the catalog contents and
/// order, and `count`. Entries come back in the order the generator drew them.
pub fn sample(
    catalog: &[CatalogEntry],
    count: usize,
    seed_key: &str,
) -> Result<Vec<CatalogEntry>, PipelineError> {
    if count > catalog.len() {
        return Err(PipelineError::InvalidSampleSize {
            requested: count,
            available: catalog.len(),
        });
    }

    let mut rng = rng_for(seed_key);
    Ok(index::sample(&mut rng, catalog.len(), count)
        .into_iter()
        .map(|idx| catalog[idx].clone())
        .collect())
}

fn rng_for(seed_key: &str) -> StdRng {
    let seed: [u8; 32] = Sha256::digest(seed_key.as_bytes()).into();
    StdRng::from_seed(seed)
}
