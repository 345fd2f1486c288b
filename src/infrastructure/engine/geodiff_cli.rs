use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::domain::{
    change::RawChange,
    error::{GeoDiffError, Result},
    ports::DiffEngine,
};
use crate::infrastructure::config::EngineConfig;

/// File extensions geodiff is able to open.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["gpkg", "sqlite", "db"];

/// `DiffEngine` backed by the `geodiff` command-line tool.
///
/// Runs `geodiff diff --json <base> <compare> <out>` and reads the change
/// listing back from `<out>`, which lives in a temp dir removed on drop.
pub struct GeodiffCli {
    binary: PathBuf,
    timeout: Duration,
}

impl GeodiffCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(&cfg.binary, cfg.timeout())
    }
}

/// Check that `path` exists and has an extension geodiff can read.
pub fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(GeoDiffError::engine(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        let shown = if ext.is_empty() {
            "(none)".to_string()
        } else {
            format!(".{ext}")
        };
        return Err(GeoDiffError::engine(format!(
            "Unsupported file format: {shown}. Supported formats: .gpkg, .sqlite, .db"
        )));
    }

    Ok(())
}

#[derive(Deserialize)]
struct ChangeListing {
    #[serde(default)]
    geodiff: Vec<RawChange>,
}

/// Parse a geodiff JSON change listing. Blank input means no changes.
pub fn parse_listing(content: &str) -> Result<Vec<RawChange>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let listing: ChangeListing = serde_json::from_str(content)
        .map_err(|e| GeoDiffError::engine(format!("Failed to parse changes JSON: {e}")))?;
    Ok(listing.geodiff)
}

#[async_trait]
impl DiffEngine for GeodiffCli {
    async fn diff(&self, base: &Path, compare: &Path) -> Result<Vec<RawChange>> {
        validate_file(base)?;
        validate_file(compare)?;

        let work_dir = tempfile::tempdir()
            .map_err(|e| GeoDiffError::engine(format!("Failed to create temp dir: {e}")))?;
        let out_path = work_dir.path().join("changes.json");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("diff")
            .arg("--json")
            .arg(base)
            .arg(compare)
            .arg(&out_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(binary = %self.binary.display(), out = %out_path.display(), "spawning geodiff");

        let child = cmd.spawn().map_err(|e| {
            GeoDiffError::engine(format!(
                "Failed to start {}: {e}",
                self.binary.display()
            ))
        })?;

        // On timeout the future is dropped, which kills the child.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                GeoDiffError::engine(format!(
                    "geodiff did not finish within {}s",
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| GeoDiffError::engine(format!("Failed to wait for geodiff: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GeoDiffError::engine(format!(
                "Failed to create changeset ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let content = match tokio::fs::read_to_string(&out_path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(GeoDiffError::engine(format!(
                    "Failed to read changes from {}: {e}",
                    out_path.display()
                )))
            }
        };

        parse_listing(&content)
    }
}
