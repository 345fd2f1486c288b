//! # geodiff — library usage example
//!
//! Shows two ways of consuming geodiff as a Rust library:
//!
//! 1. **Compare two files** — runs the `geodiff` engine, mirrors the CLI
//! 2. **From a stored change listing** — no engine, just the reporting core
//!
//! Compare two files (needs `geodiff` on PATH):
//!   cargo run --example compare_as_lib -- base.gpkg modified.gpkg
//!
//! Run the built-in listing:
//!   cargo run --example compare_as_lib

use std::path::Path;

use anyhow::Result;
use geodiff::{
    compare_raw, render_outputs, to_summary_text, AppConfig, ComparisonResult, OutputFormat,
    RawChange,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match (args.get(1), args.get(2)) {
        (Some(base), Some(compare)) => from_files(Path::new(base), Path::new(compare)).await,
        _ => from_listing(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 1 — let geodiff run the engine, same as the CLI does internally
// ─────────────────────────────────────────────────────────────────────────────
async fn from_files(base: &Path, compare: &Path) -> Result<()> {
    println!("=== Pattern 1: compare files ===\n");

    let cfg = AppConfig::load(None)?;
    let result = geodiff::compare_files(&cfg, base, compare).await?;

    let outputs = render_outputs(&result, OutputFormat::Json)?;
    println!("{}", outputs.diff_result);
    println!("has_changes={}", outputs.has_changes);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 2 — a change listing captured earlier (e.g. `geodiff diff --json`)
// ─────────────────────────────────────────────────────────────────────────────
fn from_listing() -> Result<()> {
    println!("=== Pattern 2: stored change listing ===\n");

    let listing = json!({
        "geodiff": [
            {"table": "cities", "type": "update", "changes": [{"column": 3, "old": "Capital of Italy", "new": "Capital of Italy - Updated 2024"}]},
            {"table": "cities", "type": "delete", "changes": [{"column": 0, "old": 3}]},
            {"table": "cities", "type": "insert", "changes": [{"column": 0, "new": 6}]}
        ]
    });
    let raw: Vec<RawChange> = serde_json::from_value(listing["geodiff"].clone())?;

    let result = compare_raw("italian_cities_base.gpkg", "italian_cities_modified.gpkg", raw)?;

    println!("{}\n", to_summary_text(&result));
    inspect(&result);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Walk the result for custom logic
// ─────────────────────────────────────────────────────────────────────────────
fn inspect(result: &ComparisonResult) {
    for t in result.table_summaries() {
        println!("table {} — {} change(s)", t.table, t.count);
    }
    for change in result.changes() {
        println!(
            "  {:<6} {} ({} payload key(s))",
            change.change_type(),
            change.table(),
            change.raw_payload().len()
        );
    }
}
