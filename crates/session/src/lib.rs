//! # importfix session
//!
//! Talks to a running build console (`play` / `sbt`) and uses its compiler
//! diagnostics to replace wildcard imports with the explicit members they
//! actually supply.
//!
//! ## Protocol
//!
//! ```text
//! importfix                         build console
//!     │  project <name>  ─────────────>  │
//!     │  <─────── ... Set current project to <name>
//!     │  test:compile    ─────────────>  │
//!     │  <─────── output lines ... Total time: N s
//!     │  exit            ─────────────>  │ (process exits)
//! ```
//!
//! One command is in flight at a time; every wait is bounded by the
//! configured response timeout.

mod config;
mod diagnostics;
mod error;
mod optimizer;
mod oracle;
mod scanner;
mod session;

pub use config::{OptimizerConfig, SessionConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticMatcher};
pub use error::{Result, SessionError};
pub use optimizer::{optimize_file, FileImportSink, FileOptimization, ImportSink, OptimizationLoop};
pub use oracle::BuildOracle;
pub use scanner::{ResponseScanner, ScanEvent};
pub use session::{BuildSession, SessionState};
