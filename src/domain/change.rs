use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{GeoDiffError, Result};
use crate::domain::value_objects::{Payload, TableName};

/// Kind of row-level change. Closed set: anything else the engine emits is an
/// error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Insert,
    Update,
    Delete,
}

/// Engine operation tokens and the change type each one maps to.
///
/// geodiff writes the word forms; the single letters are accepted for engines
/// that emit SQLite-session style opcodes. Matching is case-sensitive.
pub const CHANGE_TYPE_TOKENS: &[(&str, ChangeType)] = &[
    ("insert", ChangeType::Insert),
    ("update", ChangeType::Update),
    ("delete", ChangeType::Delete),
    ("I", ChangeType::Insert),
    ("U", ChangeType::Update),
    ("D", ChangeType::Delete),
];

impl ChangeType {
    /// Looks `token` up in [`CHANGE_TYPE_TOKENS`].
    pub fn from_token(token: &str) -> Option<Self> {
        CHANGE_TYPE_TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, kind)| *kind)
    }

    /// Lowercase name used in every rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Insert => "insert",
            ChangeType::Update => "update",
            ChangeType::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unprocessed change entry exactly as emitted by the diff engine.
///
/// Untyped: shape checks happen in `normalize`, which reports a bad entry
/// by its position in the listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawChange(pub Value);

impl RawChange {
    pub fn new(table: impl Into<String>, kind: impl Into<String>) -> Self {
        let mut entry = Payload::new();
        entry.insert("table".into(), Value::String(table.into()));
        entry.insert("type".into(), Value::String(kind.into()));
        Self(Value::Object(entry))
    }

    /// Adds a pass-through field. No-op if the entry is not an object.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        if let Value::Object(entry) = &mut self.0 {
            entry.insert(key.into(), value);
        }
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// A validated, typed change record. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChange {
    table: TableName,
    change_type: ChangeType,
    raw_payload: Payload,
}

impl NormalizedChange {
    /// Builds a change, rejecting an empty or whitespace-only table name.
    ///
    /// `index` is only used to locate the record in the error.
    pub fn try_new(
        index: usize,
        table: impl Into<String>,
        change_type: ChangeType,
        raw_payload: Payload,
    ) -> Result<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(GeoDiffError::invalid_record(index, "empty table name"));
        }
        Ok(Self {
            table: TableName(table),
            change_type,
            raw_payload,
        })
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    pub fn raw_payload(&self) -> &Payload {
        &self.raw_payload
    }
}
