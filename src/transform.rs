//! Field extraction from raw monster details.
//!
//! Produces a MonsterRecord-shaped candidate without judging the value types;
//! type checks belong to the schema gate. Only the two fields the gate cannot
//! do without (`name`, `hit_points`) are enforced here.

use crate::error::PipelineError;
use crate::model::RawDetail;
use serde_json::{Map, Value, json};

const UNKNOWN_NAME: &str = "Unknown";

pub fn transform(raw: &RawDetail) -> Result<Value, PipelineError> {
    let name = required(raw, "name")?;
    let hit_points = required(raw, "hit_points")?;

    Ok(json!({
        "name": name.clone(),
        "hit_points": hit_points.clone(),
        "armor_class": first_armor_class(raw),
        "actions": actions(raw),
    }))
}

fn required<'a>(raw: &'a RawDetail, field: &'static str) -> Result<&'a Value, PipelineError> {
    raw.get(field)
        .ok_or_else(|| PipelineError::MissingRequiredField {
            field,
            record: display_name(raw),
        })
}

fn display_name(raw: &RawDetail) -> String {
    raw.get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

// Source data lists armor class per condition; the first entry wins.
fn first_armor_class(raw: &RawDetail) -> Value {
    match raw.get("armor_class") {
        Some(Value::Array(entries)) => entries
            .first()
            .and_then(|entry| entry.get("value"))
            .cloned()
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn actions(raw: &RawDetail) -> Value {
    match raw.get("actions") {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        Some(Value::Array(entries)) => entries.iter().map(action).collect(),
        // Leave malformed shapes for the gate to reject.
        Some(other) => other.clone(),
    }
}

fn action(entry: &Value) -> Value {
    let mut out = Map::new();
    out.insert(
        "name".to_string(),
        entry.get("name").cloned().unwrap_or(Value::Null),
    );
    out.insert(
        "desc".to_string(),
        entry.get("desc").cloned().unwrap_or(Value::Null),
    );
    Value::Object(out)
}
