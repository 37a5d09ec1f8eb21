//! # importfix engine
//!
//! Normalizes the import block of Scala source files.
//!
//! ## Pipeline
//!
//! ```text
//! File content
//!     │
//!     ├──> SourceFile::parse
//!     │      ├─> header line
//!     │      ├─> ImportSet
//!     │      └─> code body
//!     │
//!     └──> ImportNormalizer::clean
//!            ├─> expand brace-groups
//!            ├─> rewrite / remove (config tables)
//!            ├─> sort (comparator chain) + dedup
//!            ├─> drop unused (textual usage check)
//!            └─> compact by prefix, blank line between tiers
//! ```
//!
//! ## Example
//!
//! ```rust
//! use importfix_engine::{ImportNormalizer, SourceFile};
//!
//! let mut file = SourceFile::parse(
//!     "package app\nimport scala.Some\nimport play.api.libs.json.{Json, Reads}\nval x = Json.parse(s)\n",
//! );
//! let normalizer = ImportNormalizer::default();
//! let rendered = normalizer.normalize(&mut file);
//! assert_eq!(
//!     rendered,
//!     "package app\n\nimport play.api.libs.json.Json\n\nval x = Json.parse(s)\n"
//! );
//! ```

mod config;
mod error;
mod import_set;
mod io;
mod normalizer;
mod ordering;
mod source;
mod statement;
mod usage;

pub use config::{EngineConfig, RewriteRule};
pub use error::{EngineError, Result};
pub use import_set::ImportSet;
pub use io::{read_source, write_atomic, write_source};
pub use normalizer::ImportNormalizer;
pub use ordering::{Criterion, ImportOrdering, Tier, COMPARATOR_CHAIN};
pub use source::{LineEnding, SourceFile};
pub use statement::{ImportStatement, IMPORT_KEYWORD, RENAME_ARROW, WILDCARD_MEMBER};
pub use usage::UsageFilter;
