//! JSON Schema gate for transformed monster candidates.
//!
//! The bundled schema (`schema/monster_record.schema.json`) enumerates every
//! check a record must pass: the four top-level fields, their types, and the
//! shape of each nested action. A candidate that satisfies the schema is then
//! decoded into `MonsterRecord`; failing either step yields a `Rejection`
//! rather than an error, so one bad monster never aborts a run.

use crate::model::MonsterRecord;
use anyhow::{Context, Result, anyhow};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

const BUNDLED_SCHEMA: &str = include_str!("../schema/monster_record.schema.json");
const UNKNOWN_NAME: &str = "Unknown";

/// Compiled monster schema.
pub struct MonsterSchema {
    compiled: JSONSchema,
}

/// Outcome of running one candidate through the gate.
#[derive(Debug)]
pub enum Validation {
    Accepted(MonsterRecord),
    Rejected(Rejection),
}

/// Why a candidate was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Candidate name, or `Unknown` when it has no string name.
    pub name: String,
    pub reasons: Vec<String>,
}

impl MonsterSchema {
    /// Compile the schema shipped with the crate.
    pub fn embedded() -> Result<Self> {
        let schema: Value =
            serde_json::from_str(BUNDLED_SCHEMA).context("parsing bundled monster schema")?;
        Self::from_value(&schema)
    }

    /// Compile a schema document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let schema: Value = serde_json::from_reader(
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
        )
        .with_context(|| format!("parsing schema {}", path.display()))?;
        Self::from_value(&schema).with_context(|| format!("loading schema {}", path.display()))
    }

    pub fn from_value(schema: &Value) -> Result<Self> {
        let compiled =
            JSONSchema::compile(schema).map_err(|err| anyhow!("compiling monster schema: {err}"))?;
        Ok(Self { compiled })
    }

    pub fn validate(&self, candidate: &Value) -> Validation {
        let name = candidate
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_NAME)
            .to_string();

        if let Err(errors) = self.compiled.validate(candidate) {
            let reasons = errors
                .map(|err| format!("{}: {}", location(&err.instance_path.to_string()), err))
                .collect();
            return Validation::Rejected(Rejection { name, reasons });
        }

        match serde_json::from_value::<MonsterRecord>(candidate.clone()) {
            Ok(record) => Validation::Accepted(record),
            Err(err) => Validation::Rejected(Rejection {
                name,
                reasons: vec![err.to_string()],
            }),
        }
    }
}

fn location(pointer: &str) -> &str {
    if pointer.is_empty() { "/" } else { pointer }
}
