//! Error taxonomy shared by the pipeline stages.
//!
//! Validation rejections are deliberately absent: a record that fails the
//! schema gate is a filtering outcome (`schema_gate::Validation::Rejected`),
//! not an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transport failure, non-success status, or an undecodable body.
    #[error("fetching {url} failed: {reason}")]
    RemoteFetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("cannot sample {requested} monsters from a catalog of {available}")]
    InvalidSampleSize { requested: usize, available: usize },

    #[error("monster '{record}' is missing required field '{field}'")]
    MissingRequiredField { field: &'static str, record: String },

    #[error("writing {} failed", path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn is_remote_fetch(&self) -> bool {
        matches!(self, PipelineError::RemoteFetch { .. })
    }

    /// HTTP status carried by a `RemoteFetch`, when the server answered with a
    /// non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            PipelineError::RemoteFetch { status, .. } => *status,
            _ => None,
        }
    }
}
