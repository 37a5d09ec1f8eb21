use crate::discovery::FileFilter;
use anyhow::{Context, Result};
use importfix_engine::EngineConfig;
use importfix_session::{OptimizerConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Looked up at the project root when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "importfix.toml";

const WORKERS_ENV: &str = "IMPORTFIX_WORKERS";
const MAX_WORKERS: usize = 64;

/// Everything a run needs, loaded once and passed down explicitly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Sub-projects of the build, each with its own console project
    pub modules: Vec<String>,

    /// Source folders inside every module
    pub source_dirs: Vec<String>,

    /// Extension of eligible files (without the dot)
    pub extension: String,

    /// File names never touched
    pub excluded_file_names: Vec<String>,

    /// Parallel files in the normalization pass
    pub workers: usize,

    pub engine: EngineConfig,
    pub session: SessionConfig,
    pub optimizer: OptimizerConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            modules: vec![
                "common".to_string(),
                "processor".to_string(),
                "ess".to_string(),
            ],
            source_dirs: vec!["app".to_string(), "test".to_string()],
            extension: "scala".to_string(),
            excluded_file_names: vec!["package.scala".to_string()],
            workers: 8,
            engine: EngineConfig::default(),
            session: SessionConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl ToolConfig {
    /// `explicit` file, else `<root>/importfix.toml` when present, else defaults.
    /// `IMPORTFIX_WORKERS` overrides the worker count.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let candidate = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(root.join(CONFIG_FILE_NAME)).filter(|path| path.is_file()),
        };

        let mut config = match candidate {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                log::debug!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&raw)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };

        let raw_workers = std::env::var(WORKERS_ENV).ok();
        config.workers = parse_workers(raw_workers.as_deref(), config.workers);

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extension.trim().is_empty() {
            return Err("extension must not be empty".to_string());
        }
        if self.workers == 0 {
            return Err("workers must be > 0".to_string());
        }
        if self.modules.iter().any(|module| module.trim().is_empty()) {
            return Err("module names must not be blank".to_string());
        }
        self.engine.validate()?;
        self.optimizer.validate()?;
        Ok(())
    }

    pub fn file_filter(&self) -> FileFilter {
        FileFilter::new(&self.extension, &self.excluded_file_names)
    }

    /// Console settings for `module`, started in `root`
    pub fn session_for(&self, module: &str, root: &Path) -> SessionConfig {
        let mut session = self.session.for_project(module);
        if session.working_dir.is_none() {
            session.working_dir = Some(root.to_path_buf());
        }
        session
    }
}

fn parse_workers(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_WORKERS)
}
