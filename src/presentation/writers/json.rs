use anyhow::Result;
use serde_json::{json, Map, Value};

use crate::domain::{
    change::NormalizedChange,
    comparison::ComparisonResult,
    ports::OutputWriter,
};

// ─── Document builder ─────────────────────────────────────────────────────────
//
// Key order is fixed by insertion (serde_json `preserve_order`), so the same
// result always renders to the same bytes.

/// Serialise one change: `table`, `type`, then every payload key.
///
/// Payload keys are inserted last and overwrite `table`/`type` on collision:
/// whatever the engine passed through wins.
fn change_entry(change: &NormalizedChange) -> Value {
    let mut entry = Map::new();
    entry.insert("table".into(), Value::String(change.table().0.clone()));
    entry.insert("type".into(), Value::String(change.change_type().as_str().into()));
    for (key, value) in change.raw_payload() {
        entry.insert(key.clone(), value.clone());
    }
    Value::Object(entry)
}

/// Build the structured JSON document for a comparison.
pub fn to_json(result: &ComparisonResult) -> Value {
    let s = result.summary();
    let entries: Vec<Value> = result.changes().iter().map(change_entry).collect();

    json!({
        "base_file": result.base_identifier(),
        "compare_file": result.compare_identifier(),
        "has_changes": result.has_changes(),
        "summary": {
            "total_changes": s.total_changes,
            "inserts": s.inserts,
            "updates": s.updates,
            "deletes": s.deletes
        },
        "changes": {
            "geodiff": entries
        }
    })
}

// ─── Writer ───────────────────────────────────────────────────────────────────

pub struct JsonWriter;

impl OutputWriter for JsonWriter {
    fn format(&self, result: &ComparisonResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(&to_json(result))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::aggregate::aggregate;
    use crate::domain::change::ChangeType;
    use crate::domain::value_objects::Payload;

    fn change(table: &str, kind: ChangeType, payload: Value) -> NormalizedChange {
        let payload = match payload {
            Value::Object(map) => map,
            _ => Payload::new(),
        };
        NormalizedChange::try_new(0, table, kind, payload).unwrap()
    }

    fn make_result() -> ComparisonResult {
        aggregate(
            "base.gpkg",
            "modified.gpkg",
            vec![
                change(
                    "cities",
                    ChangeType::Update,
                    json!({"changes": [{"column": 3, "old": "Capital of Italy", "new": "Capital of Italy - Updated 2024"}]}),
                ),
                change("cities", ChangeType::Delete, json!({"changes": [{"column": 0, "old": 3}]})),
                change("cities", ChangeType::Insert, json!({"changes": [{"column": 0, "new": 6}]})),
            ],
        )
    }

    #[test]
    fn document_has_the_expected_shape() {
        let doc = to_json(&make_result());

        assert_eq!(doc["base_file"], json!("base.gpkg"));
        assert_eq!(doc["compare_file"], json!("modified.gpkg"));
        assert_eq!(doc["has_changes"], json!(true));
        assert_eq!(
            doc["summary"],
            json!({"total_changes": 3, "inserts": 1, "updates": 1, "deletes": 1})
        );

        let entries = doc["changes"]["geodiff"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["table"], json!("cities"));
        assert_eq!(entries[0]["type"], json!("update"));
        assert_eq!(entries[0]["changes"][0]["column"], json!(3));
        assert_eq!(entries[1]["type"], json!("delete"));
        assert_eq!(entries[2]["type"], json!("insert"));
    }

    #[test]
    fn top_level_keys_keep_a_fixed_order() {
        let doc = to_json(&make_result());
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["base_file", "compare_file", "has_changes", "summary", "changes"]
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = JsonWriter.format(&make_result()).unwrap();
        let b = JsonWriter.format(&make_result()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parsed_output_has_consistent_totals() {
        let output = JsonWriter.format(&make_result()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        let s = &parsed["summary"];

        let total = s["total_changes"].as_u64().unwrap();
        let sum = s["inserts"].as_u64().unwrap()
            + s["updates"].as_u64().unwrap()
            + s["deletes"].as_u64().unwrap();
        assert_eq!(total, sum);
        assert_eq!(total as usize, parsed["changes"]["geodiff"].as_array().unwrap().len());
    }

    #[test]
    fn empty_result_renders_empty_change_list() {
        let doc = to_json(&aggregate("a.gpkg", "b.gpkg", vec![]));

        assert_eq!(doc["has_changes"], json!(false));
        assert_eq!(doc["summary"]["total_changes"], json!(0));
        assert_eq!(doc["changes"], json!({"geodiff": []}));
    }

    #[test]
    fn payload_wins_on_key_collision() {
        let result = aggregate(
            "a",
            "b",
            vec![change("roads", ChangeType::Insert, json!({"table": "roads_v2", "fid": 7}))],
        );

        let entry = &to_json(&result)["changes"]["geodiff"][0];
        assert_eq!(entry["table"], json!("roads_v2"));
        assert_eq!(entry["type"], json!("insert"));
        assert_eq!(entry["fid"], json!(7));
    }
}
