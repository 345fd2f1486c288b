use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{
    change::{ChangeType, NormalizedChange, RawChange},
    error::{GeoDiffError, Result},
    value_objects::Payload,
};

/// Turns raw engine records into typed changes, preserving order.
///
/// Fails on the first record that cannot be normalized: a comparison never
/// proceeds with some records silently dropped. Everything other than
/// `table` and `type` is carried through untouched as the payload.
#[instrument(name = "normalize", skip_all, fields(records = raw_changes.len()), level = "debug")]
pub fn normalize(raw_changes: Vec<RawChange>) -> Result<Vec<NormalizedChange>> {
    let mut normalized = Vec::with_capacity(raw_changes.len());

    for (index, raw) in raw_changes.into_iter().enumerate() {
        normalized.push(normalize_one(index, raw)?);
    }

    debug!(changes = normalized.len(), "normalize completed");
    Ok(normalized)
}

fn normalize_one(index: usize, raw: RawChange) -> Result<NormalizedChange> {
    let entry = match raw.0 {
        Value::Object(entry) => entry,
        other => {
            return Err(GeoDiffError::invalid_record(
                index,
                format!("expected an object, got {other}"),
            ))
        }
    };

    let mut table = None;
    let mut kind = None;
    let mut payload = Payload::new();
    for (key, value) in entry {
        match key.as_str() {
            "table" => table = Some(value),
            "type" => kind = Some(value),
            _ => {
                payload.insert(key, value);
            }
        }
    }

    let table = match table {
        Some(Value::String(t)) => t,
        Some(other) => {
            return Err(GeoDiffError::invalid_record(
                index,
                format!("table name must be a string, got {other}"),
            ))
        }
        None => return Err(GeoDiffError::invalid_record(index, "missing table name")),
    };

    let change_type = match kind {
        Some(Value::String(token)) => ChangeType::from_token(&token)
            .ok_or_else(|| GeoDiffError::unrecognized(index, token.as_str()))?,
        Some(other) => return Err(GeoDiffError::unrecognized(index, other.to_string())),
        None => return Err(GeoDiffError::unrecognized(index, "")),
    };

    NormalizedChange::try_new(index, table, change_type, payload)
}
