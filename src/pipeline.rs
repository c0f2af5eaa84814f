//! End-to-end run: catalog → sample → per-monster fetch/transform/gate → write.
//!
//! Per-monster work fans out over a small pool of scoped threads. Workers pull
//! the next sampled index from a shared counter and report `(index, outcome)`;
//! outcomes are slotted back by index so the output keeps the sampled order no
//! matter which fetch finishes first. One monster failing never stops the
//! others from being processed; `ItemFailurePolicy` decides whether such a
//! failure still fails the run.

use crate::client::MonsterSource;
use crate::config::{DEFAULT_SAMPLE_COUNT, DEFAULT_WORKERS, ItemFailurePolicy};
use crate::error::PipelineError;
use crate::model::{CatalogEntry, MonsterRecord};
use crate::retry::{CATALOG_RETRY, DETAIL_RETRY, RetryPolicy, retry};
use crate::sampler::sample;
use crate::schema_gate::{MonsterSchema, Rejection, Validation};
use crate::transform::transform;
use crate::writer::{DEFAULT_OUTPUT_PATH, write_records};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use tracing::{error, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub sample_count: usize,
    pub workers: usize,
    pub item_failures: ItemFailurePolicy,
    pub catalog_retry: RetryPolicy,
    pub detail_retry: RetryPolicy,
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            workers: DEFAULT_WORKERS,
            item_failures: ItemFailurePolicy::Drop,
            catalog_retry: CATALOG_RETRY,
            detail_retry: DETAIL_RETRY,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// A sampled monster that could not be fetched or transformed.
#[derive(Debug)]
pub struct ItemFailure {
    pub name: String,
    pub reference: String,
    pub error: PipelineError,
}

/// Per-monster result before compaction.
#[derive(Debug)]
pub enum ItemOutcome {
    Kept(MonsterRecord),
    Rejected(Rejection),
    Failed(ItemFailure),
}

#[derive(Debug)]
pub struct RunReport {
    pub output_path: PathBuf,
    /// Survivors in sampled order, exactly as written.
    pub records: Vec<MonsterRecord>,
    pub rejected: Vec<Rejection>,
    pub failed: Vec<ItemFailure>,
}

pub struct Pipeline<S> {
    source: S,
    schema: MonsterSchema,
    config: PipelineConfig,
}

impl<S: MonsterSource> Pipeline<S> {
    pub fn new(source: S, schema: MonsterSchema, config: PipelineConfig) -> Self {
        Self {
            source,
            schema,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Execute one run with the given sampling seed key.
    pub fn run(&self, seed_key: &str) -> Result<RunReport, PipelineError> {
        info!("Fetching full monster list from API...");
        let catalog = retry(&self.config.catalog_retry, "fetch monster list", || {
            self.source.fetch_catalog()
        })?;
        info!("catalog lists {} monsters", catalog.len());

        let sampled = sample(&catalog, self.config.sample_count, seed_key)?;
        info!(
            "selected {} monsters for {seed_key}: {}",
            sampled.len(),
            sampled
                .iter()
                .map(|entry| entry.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut records = Vec::new();
        let mut rejected = Vec::new();
        let mut failed = Vec::new();
        for outcome in self.process_all(&sampled) {
            match outcome {
                ItemOutcome::Kept(record) => records.push(record),
                ItemOutcome::Rejected(rejection) => rejected.push(rejection),
                ItemOutcome::Failed(failure) => failed.push(failure),
            }
        }

        if self.config.item_failures == ItemFailurePolicy::Abort && !failed.is_empty() {
            let first = failed.remove(0);
            error!(
                "aborting run: {} of {} sampled monsters failed",
                failed.len() + 1,
                sampled.len()
            );
            return Err(first.error);
        }

        write_records(&records, &self.config.output_path)?;
        info!(
            "Successfully wrote {} monsters to {}",
            records.len(),
            self.config.output_path.display()
        );

        Ok(RunReport {
            output_path: self.config.output_path.clone(),
            records,
            rejected,
            failed,
        })
    }

    /// Process every sampled entry, returning outcomes in sampled order.
    pub fn process_all(&self, sampled: &[CatalogEntry]) -> Vec<ItemOutcome> {
        if sampled.is_empty() {
            return Vec::new();
        }
        let workers = self.config.workers.clamp(1, sampled.len());
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, ItemOutcome)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                scope.spawn(move || {
                    loop {
                        let idx = next.fetch_add(1, Ordering::Relaxed);
                        let Some(entry) = sampled.get(idx) else {
                            break;
                        };
                        if tx.send((idx, self.process_item(entry))).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);

        let mut slots: Vec<Option<ItemOutcome>> = sampled.iter().map(|_| None).collect();
        for (idx, outcome) in rx {
            slots[idx] = Some(outcome);
        }
        slots.into_iter().flatten().collect()
    }

    /// Fetch, transform, and gate a single sampled monster.
    pub fn process_item(&self, entry: &CatalogEntry) -> ItemOutcome {
        let label = format!("fetch {}", entry.reference);
        let candidate = retry(&self.config.detail_retry, &label, || {
            self.source.fetch_detail(&entry.reference)
        })
        .and_then(|raw| transform(&raw));

        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(err) => {
                error!("monster {} ({}) failed: {err}", entry.name, entry.reference);
                return ItemOutcome::Failed(ItemFailure {
                    name: entry.name.clone(),
                    reference: entry.reference.clone(),
                    error: err,
                });
            }
        };

        match self.schema.validate(&candidate) {
            Validation::Accepted(record) => ItemOutcome::Kept(record),
            Validation::Rejected(rejection) => {
                warn!(
                    "Validation failed for monster: {}\n{}",
                    rejection.name,
                    rejection.reasons.join("\n")
                );
                ItemOutcome::Rejected(rejection)
            }
        }
    }
}
