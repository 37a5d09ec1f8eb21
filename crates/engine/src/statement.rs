use std::fmt;

/// Keyword that opens every import line
pub const IMPORT_KEYWORD: &str = "import";

/// Member that brings a whole namespace into scope
pub const WILDCARD_MEMBER: &str = "_";

/// Marks a selector that binds a member under a local alias
pub const RENAME_ARROW: &str = "=>";

/// A single import line, kept verbatim.
///
/// Recognized shapes:
/// - `import a.b.C` (single member)
/// - `import a.b.{C, D}` (brace-group)
/// - `import a.b.{C => D}` (rename)
/// - `import a.b._` (wildcard)
///
/// Two statements are the same import exactly when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportStatement(String);

impl ImportStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns `true` when `line` starts with the `import` keyword token.
    pub fn is_import_line(line: &str) -> bool {
        line.strip_prefix(IMPORT_KEYWORD)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Dotted path following the keyword, e.g. `play.api.libs.json.Json`.
    pub fn path(&self) -> &str {
        self.0
            .strip_prefix(IMPORT_KEYWORD)
            .map_or(self.0.as_str(), str::trim_start)
    }

    /// Splits at the last `.` into the prefix (keyword included) and the member.
    pub fn split(&self) -> Option<(&str, &str)> {
        let idx = self.0.rfind('.')?;
        Some((&self.0[..idx], &self.0[idx + 1..]))
    }

    /// Text after the last `.`, or the whole path for dotless imports.
    pub fn trailing_symbol(&self) -> &str {
        self.split().map_or_else(|| self.path(), |(_, member)| member)
    }

    pub fn is_wildcard(&self) -> bool {
        self.trailing_symbol() == WILDCARD_MEMBER
    }

    pub fn is_rename(&self) -> bool {
        self.0.contains(RENAME_ARROW)
    }

    pub fn is_group(&self) -> bool {
        self.trailing_symbol().starts_with('{')
    }

    /// Splits a brace-group into one statement per member.
    ///
    /// Returns `None` for anything that is not a plain brace-group: single
    /// members, wildcards, and groups carrying a rename stay as they are.
    pub fn expand(&self) -> Option<Vec<ImportStatement>> {
        if self.is_rename() {
            return None;
        }
        let open = self.0.find('{')?;
        let close = self.0.rfind('}')?;
        if close < open {
            return None;
        }

        let prefix = &self.0[..open];
        Some(
            self.0[open + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(|member| Self(format!("{prefix}{member}")))
                .collect(),
        )
    }

    /// Same prefix, different member: `import a.b._` with `C` gives `import a.b.C`.
    pub fn with_member(&self, member: &str) -> Option<ImportStatement> {
        let (prefix, _) = self.split()?;
        Some(Self(format!("{prefix}.{member}")))
    }

    /// Replaces the first occurrence of `from`; returns whether anything changed.
    pub fn rewrite(&mut self, from: &str, to: &str) -> bool {
        if !self.0.contains(from) {
            return false;
        }
        self.0 = self.0.replacen(from, to, 1);
        true
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImportStatement {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ImportStatement {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for ImportStatement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_import_keyword_as_token() {
        assert!(ImportStatement::is_import_line("import a.b.C"));
        assert!(ImportStatement::is_import_line("import\ta.b.C"));
        assert!(!ImportStatement::is_import_line("importantValue = 1"));
        assert!(!ImportStatement::is_import_line("  import a.b.C"));
    }

    #[test]
    fn splits_path_prefix_and_member() {
        let statement = ImportStatement::new("import play.api.libs.json.Json");
        assert_eq!(statement.path(), "play.api.libs.json.Json");
        assert_eq!(
            statement.split(),
            Some(("import play.api.libs.json", "Json"))
        );
        assert_eq!(statement.trailing_symbol(), "Json");

        let dotless = ImportStatement::new("import scala");
        assert_eq!(dotless.split(), None);
        assert_eq!(dotless.trailing_symbol(), "scala");
    }

    #[test]
    fn classifies_shapes() {
        assert!(ImportStatement::new("import a.b._").is_wildcard());
        assert!(ImportStatement::new("import a.b.{C => D}").is_rename());
        assert!(ImportStatement::new("import a.b.{C, D}").is_group());
        assert!(!ImportStatement::new("import a.b.C").is_group());
    }

    #[test]
    fn expands_plain_groups_only() {
        let group = ImportStatement::new("import a.b.{C, D ,E}");
        let expanded: Vec<String> = group
            .expand()
            .expect("group expands")
            .into_iter()
            .map(ImportStatement::into_string)
            .collect();
        assert_eq!(expanded, vec!["import a.b.C", "import a.b.D", "import a.b.E"]);

        assert!(ImportStatement::new("import a.b.{C => D, E}")
            .expand()
            .is_none());
        assert!(ImportStatement::new("import a.b._").expand().is_none());
        assert!(ImportStatement::new("import a.b.C").expand().is_none());
    }

    #[test]
    fn substitutes_member() {
        let wildcard = ImportStatement::new("import models._");
        assert_eq!(
            wildcard.with_member("User").map(ImportStatement::into_string),
            Some("import models.User".to_string())
        );
    }

    #[test]
    fn rewrites_first_occurrence_only() {
        let mut statement = ImportStatement::new("import concurrent.concurrent.X");
        assert!(statement.rewrite(" concurrent.", " scala.concurrent."));
        assert_eq!(statement.as_str(), "import scala.concurrent.concurrent.X");
        assert!(!statement.rewrite(" missing.", " other."));
    }
}
