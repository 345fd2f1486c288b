use anyhow::Result;

use crate::domain::{comparison::ComparisonResult, ports::OutputWriter};

/// Render the fixed-layout plain-text summary.
///
/// The "Tables affected" block only appears when there is at least one change.
pub fn to_summary_text(result: &ComparisonResult) -> String {
    let s = result.summary();
    let mut lines = vec![
        format!(
            "GeoDiff Summary: {} vs {}",
            result.base_identifier(),
            result.compare_identifier()
        ),
        format!(
            "  Has Changes:   {}",
            if result.has_changes() { "Yes" } else { "No" }
        ),
        format!("  Total Changes: {}", s.total_changes),
        format!("  Inserts:       {}", s.inserts),
        format!("  Updates:       {}", s.updates),
        format!("  Deletes:       {}", s.deletes),
    ];

    if s.total_changes > 0 {
        lines.push(String::new());
        lines.push("  Tables affected:".to_string());
        for t in result.table_summaries() {
            lines.push(format!("    - {}: {} change(s)", t.table, t.count));
        }
    }

    lines.join("\n")
}

pub struct SummaryWriter;

impl OutputWriter for SummaryWriter {
    fn format(&self, result: &ComparisonResult) -> Result<String> {
        Ok(to_summary_text(result))
    }
}
