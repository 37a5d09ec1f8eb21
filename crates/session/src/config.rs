use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const PROJECT_PLACEHOLDER: &str = "{project}";

/// How to drive the interactive build console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Console executable
    pub program: String,

    /// Extra arguments passed to `program`
    pub args: Vec<String>,

    /// Sub-project selected right after start
    pub project: String,

    /// Directory the console is started in (inherits ours when unset)
    pub working_dir: Option<PathBuf>,

    /// Project-select command; `{project}` is substituted
    pub select_command: String,

    /// Output fragment that confirms the selection; `{project}` is substituted
    pub ready_marker: String,

    /// Output fragment that ends every command's output
    pub complete_marker: String,

    pub compile_command: String,

    pub exit_command: String,

    /// Upper bound on waiting for any single marker
    pub response_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            program: "play".to_string(),
            args: Vec::new(),
            project: String::new(),
            working_dir: None,
            select_command: "project {project}".to_string(),
            ready_marker: "Set current project to {project}".to_string(),
            complete_marker: "Total time:".to_string(),
            compile_command: "test:compile".to_string(),
            exit_command: "exit".to_string(),
            response_timeout_secs: 600,
        }
    }
}

impl SessionConfig {
    /// Same settings, aimed at `project`
    pub fn for_project(&self, project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..self.clone()
        }
    }

    pub fn select_line(&self) -> String {
        self.select_command
            .replace(PROJECT_PLACEHOLDER, &self.project)
    }

    pub fn ready_line(&self) -> String {
        self.ready_marker.replace(PROJECT_PLACEHOLDER, &self.project)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("program must not be empty".to_string());
        }
        if self.project.trim().is_empty() {
            return Err("project must not be empty".to_string());
        }
        if self.ready_line().trim().is_empty() || self.complete_marker.trim().is_empty() {
            return Err("ready and completion markers must not be empty".to_string());
        }
        if self.response_timeout_secs == 0 {
            return Err("response_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}

/// Bounds and patterns of the wildcard reduction search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Compile attempts per wildcard before giving up
    pub max_attempts: usize,

    /// Compiler output containing this is treated as a failed build
    pub error_marker: String,

    /// Regex over single output lines; must capture `symbol`, may capture `kind`
    pub diagnostic_pattern: String,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            error_marker: "error".to_string(),
            diagnostic_pattern: r"not found: (?P<kind>value|type) (?P<symbol>[A-Z][A-Za-z0-9_]*)"
                .to_string(),
        }
    }
}

impl OptimizerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be > 0".to_string());
        }
        if self.error_marker.is_empty() {
            return Err("error_marker must not be empty".to_string());
        }
        Ok(())
    }
}
