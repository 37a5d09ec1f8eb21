use serde::Serialize;
use std::path::{Path, PathBuf};

/// What the normalization pass did to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Rewritten,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildcardRecord {
    pub path: PathBuf,
    pub import: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFailure {
    pub module: String,
    pub error: String,
}

/// Summary of one run, printed as JSON with `--json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub files_processed: usize,
    pub files_rewritten: usize,
    pub files_unchanged: usize,
    pub failures: Vec<FileFailure>,
    pub wildcards_optimized: Vec<WildcardRecord>,
    pub wildcards_unresolved: Vec<WildcardRecord>,
    pub session_failures: Vec<SessionFailure>,
}

impl RunReport {
    pub fn record_outcome(&mut self, outcome: FileOutcome) {
        self.files_processed += 1;
        match outcome {
            FileOutcome::Rewritten => self.files_rewritten += 1,
            FileOutcome::Unchanged => self.files_unchanged += 1,
        }
    }

    pub fn record_failure(&mut self, path: &Path, error: impl ToString) {
        self.files_processed += 1;
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    /// Failure of an optimization step; the file was already counted by normalization.
    pub fn record_optimize_failure(&mut self, path: &Path, error: impl ToString) {
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    pub fn record_optimized(&mut self, path: &Path, import: &str) {
        self.wildcards_optimized.push(WildcardRecord {
            path: path.to_path_buf(),
            import: import.to_string(),
        });
    }

    pub fn record_unresolved(&mut self, path: &Path, import: &str) {
        self.wildcards_unresolved.push(WildcardRecord {
            path: path.to_path_buf(),
            import: import.to_string(),
        });
    }

    pub fn record_session_failure(&mut self, module: &str, error: impl ToString) {
        self.session_failures.push(SessionFailure {
            module: module.to_string(),
            error: error.to_string(),
        });
    }

    /// Unresolved wildcards are expected and do not fail a run.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.session_failures.is_empty()
    }

    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} files processed: {} rewritten, {} unchanged, {} failed",
            self.files_processed,
            self.files_rewritten,
            self.files_unchanged,
            self.failures.len()
        ));
        if !self.wildcards_optimized.is_empty() || !self.wildcards_unresolved.is_empty() {
            out.push_str(&format!(
                "\nwildcards: {} optimized, {} unresolved",
                self.wildcards_optimized.len(),
                self.wildcards_unresolved.len()
            ));
        }
        for failure in &self.failures {
            out.push_str(&format!(
                "\n  failed {}: {}",
                failure.path.display(),
                failure.error
            ));
        }
        for record in &self.wildcards_unresolved {
            out.push_str(&format!(
                "\n  kept {} in {}",
                record.import,
                record.path.display()
            ));
        }
        for failure in &self.session_failures {
            out.push_str(&format!(
                "\n  session for {} failed: {}",
                failure.module, failure.error
            ));
        }
        out
    }
}
