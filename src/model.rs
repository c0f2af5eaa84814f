//! Record types flowing through the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped detail payload exactly as the API returned it.
pub type RawDetail = Map<String, Value>;

/// One entry of the remote catalog listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(rename = "url")]
    pub reference: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }
}

/// Body of the catalog listing endpoint. Only `results` is consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogPage {
    pub results: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: String,
    #[serde(rename = "desc")]
    pub description: String,
}

/// A validated monster as written to the output file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub name: String,
    pub hit_points: i64,
    pub armor_class: Option<i64>,
    pub actions: Vec<ActionRecord>,
}
