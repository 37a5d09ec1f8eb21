use anyhow::{bail, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

pub mod config;
pub mod discovery;
pub mod passes;
pub mod pool;
pub mod report;

pub use config::ToolConfig;
pub use passes::{run, RunOptions};
pub use report::RunReport;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "importfix")]
#[command(about = "Normalize and optimize import blocks of Scala sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Process every module source directory instead of git-modified files
    #[arg(long)]
    all: bool,

    /// Replace wildcard imports with explicit members using the build console
    #[arg(long)]
    optimize: bool,

    /// Project root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to <root>/importfix.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = ToolConfig::load(&cli.root, cli.config.as_deref())?;
    let options = RunOptions {
        root: cli.root.clone(),
        all: cli.all,
        optimize: cli.optimize,
    };

    let report = run(&options, &config).await?;
    if cli.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)?;
    } else if report.is_success() {
        log::info!("{}", report.render_summary());
    } else {
        log::warn!("{}", report.render_summary());
    }

    if !report.is_success() {
        bail!(
            "{} file failures, {} session failures",
            report.failures.len(),
            report.session_failures.len()
        );
    }
    Ok(())
}
