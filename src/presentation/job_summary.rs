use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tabled::settings::{object::Columns, Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::domain::{comparison::ComparisonResult, ports::Reporter};

#[derive(Tabled)]
struct SummaryRow {
    metric: &'static str,
    value: String,
}

#[derive(Tabled)]
struct TableRow {
    table: String,
    changes: usize,
}

/// Render the markdown job summary for one comparison.
pub fn render_markdown(result: &ComparisonResult, generated_at: DateTime<Utc>) -> String {
    let s = result.summary();
    let mut md = String::new();

    md.push_str("## GeoDiff Report\n\n");
    md.push_str(&format!(
        "`{}` → `{}`\n\n",
        result.base_identifier(),
        result.compare_identifier()
    ));

    if result.has_changes() {
        md.push_str(&format!("**{} change(s) detected.**\n\n", s.total_changes));
    } else {
        md.push_str("**No changes detected.**\n\n");
    }

    let summary_rows = vec![
        SummaryRow {
            metric: "Has changes",
            value: if result.has_changes() { "Yes" } else { "No" }.to_string(),
        },
        SummaryRow {
            metric: "Total changes",
            value: s.total_changes.to_string(),
        },
        SummaryRow {
            metric: "Inserts",
            value: s.inserts.to_string(),
        },
        SummaryRow {
            metric: "Updates",
            value: s.updates.to_string(),
        },
        SummaryRow {
            metric: "Deletes",
            value: s.deletes.to_string(),
        },
    ];
    let summary_table = Table::new(summary_rows)
        .with(Style::markdown())
        .with(Modify::new(Columns::new(1..=1)).with(Alignment::right()))
        .to_string();
    md.push_str(&summary_table);
    md.push_str("\n\n");

    if result.has_changes() {
        let rows: Vec<TableRow> = result
            .table_summaries()
            .iter()
            .map(|t| TableRow {
                table: t.table.to_string(),
                changes: t.count,
            })
            .collect();
        let tables = Table::new(rows)
            .with(Style::markdown())
            .with(Modify::new(Columns::new(1..=1)).with(Alignment::right()))
            .to_string();

        md.push_str("### Tables affected\n\n");
        md.push_str(&tables);
        md.push_str("\n\n");
    }

    md.push_str(&format!(
        "_Generated at {}_\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    md
}

/// Appends a markdown job summary to a file, the way CI runners collect them.
pub struct MarkdownReporter {
    path: PathBuf,
}

impl MarkdownReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for MarkdownReporter {
    fn report(&self, result: &ComparisonResult) -> Result<()> {
        let markdown = render_markdown(result, Utc::now());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open job summary {}", self.path.display()))?;
        file.write_all(markdown.as_bytes())
            .with_context(|| format!("Failed to write job summary {}", self.path.display()))?;
        Ok(())
    }
}
