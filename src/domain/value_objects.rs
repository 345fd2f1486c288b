use serde::{Deserialize, Serialize};

/// Newtype for table names as reported by the diff engine.
///
/// Never empty: the normalizer rejects blank names before one of these is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(pub String);

impl TableName {
    /// Returns the raw table name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque column-level data carried through from the engine untouched.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Rendering requested for the `diff_result` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Summary,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            other => Err(format!(
                "unknown output format '{other}' (expected 'json' or 'summary')"
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
