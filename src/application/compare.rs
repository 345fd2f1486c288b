use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::application::{aggregate::aggregate, normalize::normalize};
use crate::domain::{
    comparison::ComparisonResult,
    error::Result,
    ports::DiffEngine,
};

// ─── Compare Service ───

/// Runs one comparison: engine → normalize → aggregate.
///
/// Stateless between calls; every call builds its own result.
pub struct CompareService {
    engine: Arc<dyn DiffEngine>,
}

impl CompareService {
    pub fn new(engine: Arc<dyn DiffEngine>) -> Self {
        Self { engine }
    }

    pub async fn compare(&self, base: &Path, compare: &Path) -> Result<ComparisonResult> {
        let raw = self.engine.diff(base, compare).await?;
        let changes = normalize(raw)?;
        let result = aggregate(
            base.display().to_string(),
            compare.display().to_string(),
            changes,
        );

        info!(
            has_changes = result.has_changes(),
            total = result.total_changes(),
            tables = result.table_summaries().len(),
            "comparison completed"
        );

        Ok(result)
    }
}
