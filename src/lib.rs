use std::path::Path;
use std::sync::Arc;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// ─── Log level ────────────────────────────────────────────────────────────────

/// Controls the verbosity of geodiff's internal tracing output.
///
/// Pass to [`init_tracing`] before calling any async entry point.
///
/// | Variant | `tracing` level | When to use                              |
/// |---------|-----------------|------------------------------------------|
/// | `Error` | `error`         | `--quiet` / CI scripting                 |
/// | `Info`  | `info`          | Default — shows engine timing and totals |
/// | `Debug` | `debug`         | `--verbose` — shows engine invocation    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

/// Initialise the global `tracing` subscriber for geodiff.
///
/// Respects `RUST_LOG` when set, falling back to `level` otherwise. Logs are
/// written to stderr: stdout is reserved for the `diff_result` output.
///
/// Call this **once** at application startup. Library consumers who manage
/// their own subscriber should skip this.
///
/// Only available when the `cli` feature is enabled (pulls in
/// `tracing-subscriber`).
#[cfg(feature = "cli")]
pub fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let default_filter = match level {
        LogLevel::Error => "geodiff=error",
        LogLevel::Info => "geodiff=info",
        LogLevel::Debug => "geodiff=debug",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

// ─── Public API Facade ───

pub use application::aggregate::aggregate;
pub use application::normalize::normalize;
pub use domain::change::{ChangeType, NormalizedChange, RawChange, CHANGE_TYPE_TOKENS};
pub use domain::comparison::{validate, ComparisonResult, Summary, TableSummary};
pub use domain::error::GeoDiffError;
pub use domain::ports::{DiffEngine, OutputWriter, Reporter};
pub use domain::value_objects::{OutputFormat, Payload, TableName};
pub use infrastructure::config::{AppConfig, EngineConfig, OutputConfig};
pub use infrastructure::engine::GeodiffCli;
pub use presentation::writers::json::to_json;
pub use presentation::writers::summary::to_summary_text;
pub use presentation::writers::{render_outputs, ActionOutputs};

use crate::application::compare::CompareService;
use crate::application::monitoring::MonitoringEngine;

// ─── Public entry points ───

/// Compare two files with the geodiff command-line engine.
///
/// The engine binary and timeout come from `cfg.engine`. Either a complete,
/// consistent [`ComparisonResult`] comes back or an error does.
pub async fn compare_files(
    cfg: &AppConfig,
    base: &Path,
    compare: &Path,
) -> Result<ComparisonResult, GeoDiffError> {
    let engine = Arc::new(MonitoringEngine::new(Arc::new(GeodiffCli::from_config(
        &cfg.engine,
    ))));
    CompareService::new(engine).compare(base, compare).await
}

/// Build a result from raw change records already obtained from an engine.
///
/// Pure: no I/O, no engine. Useful when the change listing was produced
/// elsewhere (e.g. a stored `geodiff --json` output).
pub fn compare_raw(
    base_id: &str,
    compare_id: &str,
    raw_changes: Vec<RawChange>,
) -> Result<ComparisonResult, GeoDiffError> {
    let changes = normalize(raw_changes)?;
    Ok(aggregate(base_id, compare_id, changes))
}
