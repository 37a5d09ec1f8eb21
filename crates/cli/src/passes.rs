use crate::config::ToolConfig;
use crate::discovery::{discover_files, group_by_module, modified_files};
use crate::pool::WorkerPool;
use crate::report::{FileOutcome, RunReport};
use anyhow::Result;
use importfix_engine::{read_source, write_atomic, ImportNormalizer};
use importfix_session::{optimize_file, BuildSession, OptimizationLoop, SessionState};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a run covers
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    /// Every module source directory instead of git-modified files
    pub all: bool,
    /// Also reduce wildcard imports through the build console
    pub optimize: bool,
}

/// Cleans one file; content that is already canonical is not rewritten.
pub async fn normalize_file(
    path: &Path,
    normalizer: &ImportNormalizer,
) -> importfix_engine::Result<FileOutcome> {
    let (mut source, original) = read_source(path).await?;
    let rendered = normalizer.normalize(&mut source);
    if rendered == original {
        log::debug!("{} already clean", path.display());
        return Ok(FileOutcome::Unchanged);
    }
    write_atomic(path, &rendered).await?;
    log::debug!("Rewrote {}", path.display());
    Ok(FileOutcome::Rewritten)
}

/// Normalizes `files` with at most `workers` in flight.
pub async fn normalize_files(
    files: &[PathBuf],
    normalizer: &Arc<ImportNormalizer>,
    workers: usize,
    report: &mut RunReport,
) {
    let mut pool = WorkerPool::new(workers);
    for path in files {
        let path = path.clone();
        let normalizer = normalizer.clone();
        pool.submit(path.clone(), async move {
            normalize_file(&path, &normalizer).await
        });
    }

    for (path, joined) in pool.wait_all().await {
        match joined {
            Ok(Ok(outcome)) => report.record_outcome(outcome),
            Ok(Err(err)) => {
                log::error!("Failed to normalize {}: {err}", path.display());
                report.record_failure(&path, err);
            }
            Err(err) => {
                log::error!("Normalization of {} failed: {err}", path.display());
                report.record_failure(&path, err);
            }
        }
    }
}

/// Optimizes `files` one after another through a single console for `module`.
pub async fn optimize_files(
    module: &str,
    files: &[PathBuf],
    config: &ToolConfig,
    root: &Path,
    normalizer: &ImportNormalizer,
    report: &mut RunReport,
) {
    if files.is_empty() {
        return;
    }

    let optimizer = match OptimizationLoop::new(&config.optimizer) {
        Ok(optimizer) => optimizer,
        Err(err) => {
            report.record_session_failure(module, err);
            return;
        }
    };

    let mut session = match BuildSession::spawn(config.session_for(module, root)).await {
        Ok(session) => session,
        Err(err) => {
            log::error!("Could not start build session for {module}: {err}");
            report.record_session_failure(module, err);
            return;
        }
    };

    for path in files {
        match optimize_file(path, normalizer, &optimizer, &mut session).await {
            Ok(outcome) => {
                for (wildcard, _) in &outcome.resolved {
                    report.record_optimized(path, wildcard);
                }
                for wildcard in &outcome.unresolved {
                    report.record_unresolved(path, wildcard);
                }
            }
            Err(err) => {
                log::error!("Failed to optimize {}: {err}", path.display());
                report.record_optimize_failure(path, &err);
                if session.state() != SessionState::Ready {
                    report.record_session_failure(module, err);
                    // The console is mid-command or gone; dropping it kills the process.
                    return;
                }
            }
        }
    }

    if let Err(err) = session.terminate().await {
        log::warn!("Build session for {module} did not exit cleanly: {err}");
    }
}

/// Runs the configured passes and reports what happened.
pub async fn run(options: &RunOptions, config: &ToolConfig) -> Result<RunReport> {
    let normalizer = Arc::new(ImportNormalizer::new(config.engine.clone())?);
    let filter = config.file_filter();
    let mut report = RunReport::default();

    if options.all {
        for module in &config.modules {
            for dir in &config.source_dirs {
                let dir_path = options.root.join(module).join(dir);
                let files = discover_files(&dir_path, &filter);
                if files.is_empty() {
                    continue;
                }
                log::info!("Processing {}", dir_path.display());
                normalize_files(&files, &normalizer, config.workers, &mut report).await;
                if options.optimize {
                    optimize_files(module, &files, config, &options.root, &normalizer, &mut report)
                        .await;
                }
            }
        }
        return Ok(report);
    }

    let files = modified_files(&options.root, &filter).await;
    normalize_files(&files, &normalizer, config.workers, &mut report).await;
    if options.optimize {
        for (module, module_files) in group_by_module(&options.root, &files, &config.modules) {
            optimize_files(
                &module,
                &module_files,
                config,
                &options.root,
                &normalizer,
                &mut report,
            )
            .await;
        }
    }
    Ok(report)
}
