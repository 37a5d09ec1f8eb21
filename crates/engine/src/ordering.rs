use crate::config::EngineConfig;
use crate::statement::ImportStatement;
use std::cmp::Ordering;

/// Coarse ordering class of an import; also decides where blank separators go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    ProjectLocal,
    ExternalLibrary,
    LanguageCore,
}

/// One link of the comparator chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// Language-core imports sort after everything else
    LanguageCore,
    /// External-library imports sort after project imports
    ExternalLibrary,
    /// Plain byte order of the dotted path
    Lexicographic,
}

/// Evaluated left to right; the first non-equal result wins.
pub const COMPARATOR_CHAIN: [Criterion; 3] = [
    Criterion::LanguageCore,
    Criterion::ExternalLibrary,
    Criterion::Lexicographic,
];

/// Orders imports project-local, then external-library, then language-core.
#[derive(Debug, Clone, Copy)]
pub struct ImportOrdering<'a> {
    config: &'a EngineConfig,
}

impl<'a> ImportOrdering<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn tier(&self, statement: &ImportStatement) -> Tier {
        let path = statement.path();
        if matches_any(path, &self.config.language_prefixes) {
            Tier::LanguageCore
        } else if matches_any(path, &self.config.external_prefixes) {
            Tier::ExternalLibrary
        } else {
            Tier::ProjectLocal
        }
    }

    pub fn compare(&self, a: &ImportStatement, b: &ImportStatement) -> Ordering {
        COMPARATOR_CHAIN
            .iter()
            .map(|criterion| self.compare_by(*criterion, a.path(), b.path()))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    pub fn compare_by(&self, criterion: Criterion, a: &str, b: &str) -> Ordering {
        match criterion {
            Criterion::LanguageCore => compare_membership(a, b, &self.config.language_prefixes),
            Criterion::ExternalLibrary => {
                compare_membership(a, b, &self.config.external_prefixes)
            }
            Criterion::Lexicographic => a.cmp(b),
        }
    }
}

// Non-members first: `false < true`.
fn compare_membership(a: &str, b: &str, prefixes: &[String]) -> Ordering {
    matches_any(a, prefixes).cmp(&matches_any(b, prefixes))
}

/// Prefixes match whole leading segments, so `com` does not claim `common.*`.
fn matches_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        path.strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}
