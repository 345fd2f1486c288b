use crate::domain::{change::RawChange, comparison::ComparisonResult, error::Result};
use async_trait::async_trait;
use std::path::Path;

/// Port: the external row-level diff engine (implemented by `GeodiffCli`).
///
/// Returns raw changes in engine order. Any failure to produce them is a
/// `GeoDiffError::Engine`; implementations must not retry.
#[async_trait]
pub trait DiffEngine: Send + Sync {
    async fn diff(&self, base: &Path, compare: &Path) -> Result<Vec<RawChange>>;
}

/// Port: output formatting (implemented by JsonWriter, SummaryWriter)
pub trait OutputWriter: Send + Sync {
    /// Renders the comparison as the `diff_result` string.
    fn format(&self, result: &ComparisonResult) -> anyhow::Result<String>;
}

/// Port: CI job-summary sink (implemented by `MarkdownReporter`).
///
/// Kept outside the comparison core: it only ever sees a finished result.
pub trait Reporter: Send + Sync {
    fn report(&self, result: &ComparisonResult) -> anyhow::Result<()>;
}
