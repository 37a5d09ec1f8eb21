use crate::config::EngineConfig;
use crate::statement::ImportStatement;

/// Textual usage check of imports against a code body.
///
/// Matching is by substring, not by token: a name that shows up anywhere in
/// the body, strings and comments included, keeps its import. This keeps a
/// few unused imports around but never drops one that is referenced.
#[derive(Debug, Clone, Copy)]
pub struct UsageFilter<'a> {
    side_effect_imports: &'a [String],
}

impl<'a> UsageFilter<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            side_effect_imports: &config.side_effect_imports,
        }
    }

    pub fn is_used(&self, statement: &ImportStatement, code: &str) -> bool {
        if statement.is_wildcard() || statement.is_rename() {
            return true;
        }

        if code.contains(statement.trailing_symbol()) {
            return true;
        }

        self.is_side_effecting(statement)
    }

    /// Imports needed for implicit behavior and never referenced by name.
    pub fn is_side_effecting(&self, statement: &ImportStatement) -> bool {
        self.side_effect_imports
            .iter()
            .any(|needle| statement.as_str().contains(needle.as_str()))
    }
}
