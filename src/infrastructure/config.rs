use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::value_objects::OutputFormat;

/// Prefix for environment overrides, e.g. `GEODIFF_ENGINE__TIMEOUT_SECS=60`.
const ENV_PREFIX: &str = "GEODIFF";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// geodiff executable, looked up on `PATH` unless absolute.
    pub binary: String,
    /// Upper bound on a single engine run. Must be non-zero.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: "geodiff".to_string(),
            timeout_secs: 300,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Whether to also emit a CI job summary.
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            summary: true,
        }
    }
}

/// `<config_dir>/geodiff/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("geodiff").join("config.toml"))
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration: defaults, then a TOML file, then `GEODIFF_*` env vars.
    ///
    /// An explicit `path` must exist; the default user config file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some((p.to_path_buf(), true)),
            None => default_config_path().map(|p| (p, false)),
        };

        Self::from_sources(file, Some(env_source()))
    }

    /// Apply command-line overrides, the last and strongest layer.
    pub fn with_overrides(mut self, format: Option<OutputFormat>, summary: Option<bool>) -> Self {
        if let Some(format) = format {
            self.output.format = format;
        }
        if let Some(summary) = summary {
            self.output.summary = summary;
        }
        self
    }

    fn from_sources(
        file: Option<(PathBuf, bool)>,
        env: Option<config::Environment>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some((path, required)) = &file {
            builder = builder.add_source(
                config::File::from(path.clone())
                    .format(config::FileFormat::Toml)
                    .required(*required),
            );
        }
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let cfg: AppConfig = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .with_context(|| match &file {
                Some((path, _)) => format!("Failed to load config from {}", path.display()),
                None => "Failed to load config".to_string(),
            })?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.timeout_secs == 0 {
            bail!("engine.timeout_secs must be greater than zero");
        }
        if self.engine.binary.trim().is_empty() {
            bail!("engine.binary must not be empty");
        }
        Ok(())
    }
}
