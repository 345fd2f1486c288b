use crate::domain::{change::RawChange, error::Result, ports::DiffEngine};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Decorator: wraps any `DiffEngine`, measures wall time per `diff` call and
/// logs the outcome.
pub struct MonitoringEngine {
    inner: Arc<dyn DiffEngine>,
}

impl MonitoringEngine {
    pub fn new(inner: Arc<dyn DiffEngine>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DiffEngine for MonitoringEngine {
    #[instrument(
        name = "engine_diff",
        skip(self, base, compare),
        fields(base = %base.display(), compare = %compare.display()),
        level = "info"
    )]
    async fn diff(&self, base: &Path, compare: &Path) -> Result<Vec<RawChange>> {
        let start = Instant::now();
        let outcome = self.inner.diff(base, compare).await;
        let duration_ms = start.elapsed().as_millis();

        match &outcome {
            Ok(records) => info!(records = records.len(), duration_ms, "engine diff completed"),
            Err(e) => warn!(error = %e, duration_ms, "engine diff failed"),
        }

        outcome
    }
}
