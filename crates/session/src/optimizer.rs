use crate::config::OptimizerConfig;
use crate::diagnostics::DiagnosticMatcher;
use crate::error::{Result, SessionError};
use crate::oracle::BuildOracle;
use async_trait::async_trait;
use importfix_engine::{
    read_source, write_atomic, write_source, ImportNormalizer, ImportSet, ImportStatement,
    SourceFile,
};
use std::path::{Path, PathBuf};

/// Where intermediate import sets go while a wildcard is being resolved
#[async_trait]
pub trait ImportSink: Send {
    async fn persist(&mut self, imports: &ImportSet) -> Result<()>;
}

/// Writes the file back with each intermediate import set
pub struct FileImportSink {
    path: PathBuf,
    source: SourceFile,
}

impl FileImportSink {
    pub fn new(path: impl Into<PathBuf>, source: SourceFile) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

#[async_trait]
impl ImportSink for FileImportSink {
    async fn persist(&mut self, imports: &ImportSet) -> Result<()> {
        write_source(&self.path, &self.source, &imports.lines()).await?;
        Ok(())
    }
}

/// Bounded trial-and-error search for the explicit imports a wildcard supplies.
#[derive(Debug, Clone)]
pub struct OptimizationLoop {
    max_attempts: usize,
    error_marker: String,
    matcher: DiagnosticMatcher,
}

impl OptimizationLoop {
    pub fn new(config: &OptimizerConfig) -> Result<Self> {
        config.validate().map_err(SessionError::invalid_config)?;
        Ok(Self {
            max_attempts: config.max_attempts,
            error_marker: config.error_marker.clone(),
            matcher: DiagnosticMatcher::new(&config.diagnostic_pattern)?,
        })
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Drops `wildcard` from a copy of `imports` and compiles until clean.
    ///
    /// Each failed compile adds one explicit import per missing symbol. The
    /// returned statements replace the wildcard; after `max_attempts` failed
    /// compiles the search gives up with [`SessionError::UnresolvedImport`]
    /// and the caller must put the wildcard back.
    pub async fn resolve<O, S>(
        &self,
        wildcard: &ImportStatement,
        imports: &ImportSet,
        oracle: &mut O,
        sink: &mut S,
    ) -> Result<Vec<ImportStatement>>
    where
        O: BuildOracle + ?Sized,
        S: ImportSink + ?Sized,
    {
        let mut working: ImportSet = imports
            .iter()
            .filter(|statement| *statement != wildcard)
            .cloned()
            .collect();
        sink.persist(&working).await?;

        let mut needed: Vec<ImportStatement> = Vec::new();
        for attempt in 1..=self.max_attempts {
            log::debug!("Attempt {attempt} for {wildcard}");
            let output = oracle.compile().await?;
            log::debug!("{output}");

            if !output.contains(&self.error_marker) {
                return Ok(needed);
            }

            for diagnostic in self.matcher.scan(&output) {
                let Some(candidate) = wildcard.with_member(&diagnostic.symbol) else {
                    continue;
                };
                if !needed.contains(&candidate) {
                    needed.push(candidate);
                }
            }
            working.merge(needed.iter().cloned());
            sink.persist(&working).await?;
        }

        Err(SessionError::UnresolvedImport {
            import: wildcard.to_string(),
            attempts: self.max_attempts,
        })
    }
}

/// Outcome of optimizing one file
#[derive(Debug, Clone, Default)]
pub struct FileOptimization {
    /// Wildcards replaced, with what replaced them
    pub resolved: Vec<(String, Vec<String>)>,
    /// Wildcards kept because no clean compile was reached
    pub unresolved: Vec<String>,
}

/// Reduces every wildcard import of the file at `path`, then cleans and writes it.
///
/// Wildcards are handled in order against the imports accumulated so far.
/// An unresolved wildcard is restored on disk before moving on; any other
/// failure restores the original file content and is returned.
pub async fn optimize_file<O>(
    path: &Path,
    normalizer: &ImportNormalizer,
    optimizer: &OptimizationLoop,
    oracle: &mut O,
) -> Result<FileOptimization>
where
    O: BuildOracle + ?Sized,
{
    let (source, original) = read_source(path).await?;
    let mut current = source.imports.clone();
    current.expand();

    let mut sink = FileImportSink::new(path, source.clone());
    let mut outcome = FileOptimization::default();

    for wildcard in current.wildcards() {
        match optimizer
            .resolve(&wildcard, &current, oracle, &mut sink)
            .await
        {
            Ok(replacements) => {
                log::info!(
                    "Success {wildcard} -> [{}]",
                    replacements
                        .iter()
                        .map(ImportStatement::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                current.replace(&wildcard, &replacements);
                outcome.resolved.push((
                    wildcard.to_string(),
                    replacements.iter().map(ToString::to_string).collect(),
                ));
            }
            Err(err) if err.is_unresolved() => {
                log::warn!("Failure {wildcard}: {err}");
                sink.persist(&current).await?;
                outcome.unresolved.push(wildcard.to_string());
            }
            Err(err) => {
                if let Err(restore) = write_atomic(path, &original).await {
                    log::error!("Could not restore {}: {restore}", path.display());
                }
                return Err(err);
            }
        }
    }

    let mut cleaned = source.with_imports(current);
    let code = cleaned.code_text();
    let lines = normalizer.clean(&mut cleaned.imports, &code);
    write_source(path, &cleaned, &lines).await?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Replays canned compiler output, counting compiles
    struct ScriptedOracle {
        responses: VecDeque<String>,
        fallback: String,
        compiles: usize,
    }

    impl ScriptedOracle {
        fn new(responses: &[&str], fallback: &str) -> Self {
            Self {
                responses: responses.iter().map(|s| s.to_string()).collect(),
                fallback: fallback.to_string(),
                compiles: 0,
            }
        }
    }

    #[async_trait]
    impl BuildOracle for ScriptedOracle {
        async fn compile(&mut self) -> Result<String> {
            self.compiles += 1;
            Ok(self
                .responses
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        snapshots: Vec<Vec<String>>,
    }

    #[async_trait]
    impl ImportSink for RecordingSink {
        async fn persist(&mut self, imports: &ImportSet) -> Result<()> {
            self.snapshots.push(imports.lines());
            Ok(())
        }
    }

    fn imports(lines: &[&str]) -> ImportSet {
        lines.iter().map(|line| ImportStatement::new(*line)).collect()
    }

    fn optimizer() -> OptimizationLoop {
        OptimizationLoop::new(&OptimizerConfig::default()).expect("optimizer")
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let wildcard = ImportStatement::new("import models._");
        let set = imports(&["import a.B", "import models._"]);
        let mut oracle = ScriptedOracle::new(&[], "[error] something else broke");
        let mut sink = RecordingSink::default();

        let err = optimizer()
            .resolve(&wildcard, &set, &mut oracle, &mut sink)
            .await
            .expect_err("never compiles");

        assert!(err.is_unresolved());
        assert_eq!(oracle.compiles, 5);
        assert_eq!(sink.snapshots.len(), 6);
    }

    #[tokio::test]
    async fn returns_imports_accumulated_before_clean_compile() {
        let wildcard = ImportStatement::new("import models._");
        let set = imports(&["import a.B", "import models._"]);
        let mut oracle = ScriptedOracle::new(
            &[
                "[error] X.scala:3: not found: type User\n[error] Total time: 1 s",
                "[error] X.scala:4: not found: value Account\n[error] X.scala:3: not found: type User\n[error] Total time: 1 s",
            ],
            "[success] Total time: 1 s",
        );
        let mut sink = RecordingSink::default();

        let resolved = optimizer()
            .resolve(&wildcard, &set, &mut oracle, &mut sink)
            .await
            .expect("resolves");

        assert_eq!(oracle.compiles, 3);
        assert_eq!(
            resolved,
            vec![
                ImportStatement::new("import models.User"),
                ImportStatement::new("import models.Account"),
            ]
        );
        assert_eq!(
            sink.snapshots,
            vec![
                vec!["import a.B".to_string()],
                vec!["import a.B".to_string(), "import models.User".to_string()],
                vec![
                    "import a.B".to_string(),
                    "import models.User".to_string(),
                    "import models.Account".to_string(),
                ],
            ]
        );
    }

    #[tokio::test]
    async fn wildcard_with_no_users_resolves_to_nothing() {
        let wildcard = ImportStatement::new("import models._");
        let set = imports(&["import models._"]);
        let mut oracle = ScriptedOracle::new(&[], "[success] Total time: 1 s");
        let mut sink = RecordingSink::default();

        let resolved = optimizer()
            .resolve(&wildcard, &set, &mut oracle, &mut sink)
            .await
            .expect("resolves");
        assert!(resolved.is_empty());
        assert_eq!(oracle.compiles, 1);
    }
}
