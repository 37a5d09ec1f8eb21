use crate::ordering::ImportOrdering;
use crate::statement::{ImportStatement, RENAME_ARROW, WILDCARD_MEMBER};
use crate::usage::UsageFilter;
use std::collections::{HashMap, HashSet};

/// Ordered import statements of one source file.
///
/// Every transform mutates the set in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    statements: Vec<ImportStatement>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: impl Into<ImportStatement>) {
        self.statements.push(statement.into());
    }

    /// Appends statements not already present.
    pub fn merge(&mut self, statements: impl IntoIterator<Item = ImportStatement>) {
        for statement in statements {
            if !self.contains(&statement) {
                self.statements.push(statement);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportStatement> {
        self.statements.iter()
    }

    pub fn statements(&self) -> &[ImportStatement] {
        &self.statements
    }

    pub fn contains(&self, statement: &ImportStatement) -> bool {
        self.statements.contains(statement)
    }

    pub fn wildcards(&self) -> Vec<ImportStatement> {
        self.statements
            .iter()
            .filter(|statement| statement.is_wildcard())
            .cloned()
            .collect()
    }

    /// Statement texts, one per line
    pub fn lines(&self) -> Vec<String> {
        self.statements
            .iter()
            .map(|statement| statement.as_str().to_string())
            .collect()
    }

    /// Splits every plain brace-group into one statement per member.
    pub fn expand(&mut self) {
        let mut expanded = Vec::with_capacity(self.statements.len());
        for statement in self.statements.drain(..) {
            match statement.expand() {
                Some(members) => expanded.extend(members),
                None => expanded.push(statement),
            }
        }
        self.statements = expanded;
    }

    pub fn rewrite(&mut self, from: &str, to: &str) {
        for statement in &mut self.statements {
            statement.rewrite(from, to);
        }
    }

    /// Drops every statement whose text equals `exact`.
    pub fn remove(&mut self, exact: &str) {
        self.statements.retain(|statement| statement.as_str() != exact);
    }

    /// Replaces `target` in place with `replacements`, skipping ones already present.
    pub fn replace(&mut self, target: &ImportStatement, replacements: &[ImportStatement]) -> bool {
        let Some(position) = self.statements.iter().position(|s| s == target) else {
            return false;
        };
        self.statements.remove(position);

        let fresh: Vec<ImportStatement> = replacements
            .iter()
            .filter(|candidate| !self.statements.contains(candidate))
            .cloned()
            .collect();
        for (offset, statement) in fresh.into_iter().enumerate() {
            self.statements.insert(position + offset, statement);
        }
        true
    }

    /// Keeps the first occurrence of each distinct statement.
    pub fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.statements
            .retain(|statement| seen.insert(statement.as_str().to_string()));
    }

    pub fn sort(&mut self, ordering: &ImportOrdering<'_>) {
        self.statements.sort_by(|a, b| ordering.compare(a, b));
    }

    pub fn remove_unused(&mut self, code: &str, filter: &UsageFilter<'_>) {
        self.statements.retain(|statement| {
            let used = filter.is_used(statement, code);
            if !used {
                log::debug!("Dropping unused {statement}");
            }
            used
        });
    }

    /// Merges statements that share a prefix.
    ///
    /// Groups keep their first-seen order. A lone member stays as is; several
    /// plain members become one brace-group, or a wildcard once there are
    /// `threshold` of them. Renames always follow their group as separate
    /// statements.
    pub fn compact(&mut self, threshold: usize) {
        let mut groups: Vec<PrefixGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for statement in self.statements.drain(..) {
            let (prefix, member) = match statement.split() {
                Some((prefix, member)) => (prefix.to_string(), Some(member.to_string())),
                None => (statement.into_string(), None),
            };

            let slot = *index.entry(prefix.clone()).or_insert_with(|| {
                groups.push(PrefixGroup {
                    prefix,
                    members: Vec::new(),
                });
                groups.len() - 1
            });
            if let Some(member) = member {
                groups[slot].members.push(member);
            }
        }

        self.statements = groups
            .into_iter()
            .flat_map(|group| group.emit(threshold))
            .collect();
    }

    /// Statement lines with a blank line wherever the tier changes.
    pub fn layout(&self, ordering: &ImportOrdering<'_>) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.statements.len() + 2);
        let mut previous = None;
        for statement in &self.statements {
            let tier = ordering.tier(statement);
            if previous.is_some_and(|prev| prev != tier) {
                lines.push(String::new());
            }
            previous = Some(tier);
            lines.push(statement.as_str().to_string());
        }
        lines
    }
}

impl FromIterator<ImportStatement> for ImportSet {
    fn from_iter<T: IntoIterator<Item = ImportStatement>>(iter: T) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ImportSet {
    type Item = &'a ImportStatement;
    type IntoIter = std::slice::Iter<'a, ImportStatement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

struct PrefixGroup {
    prefix: String,
    members: Vec<String>,
}

impl PrefixGroup {
    fn emit(self, threshold: usize) -> Vec<ImportStatement> {
        let prefix = self.prefix;
        match self.members.as_slice() {
            [] => return vec![ImportStatement::new(prefix)],
            [single] => return vec![ImportStatement::new(format!("{prefix}.{single}"))],
            _ => {}
        }

        let (renames, mut items): (Vec<String>, Vec<String>) = self
            .members
            .into_iter()
            .partition(|member| member.contains(RENAME_ARROW));

        // A wildcard selector must come last inside braces.
        if let Some(pos) = items.iter().position(|item| item == WILDCARD_MEMBER) {
            let wildcard = items.remove(pos);
            items.retain(|item| item != WILDCARD_MEMBER);
            items.push(wildcard);
        }

        let mut out = Vec::with_capacity(renames.len() + 1);
        match items.len() {
            0 => {}
            1 => out.push(ImportStatement::new(format!("{prefix}.{}", items[0]))),
            n if n < threshold => out.push(ImportStatement::new(format!(
                "{prefix}.{{{}}}",
                items.join(", ")
            ))),
            _ => out.push(ImportStatement::new(format!("{prefix}.{WILDCARD_MEMBER}"))),
        }
        out.extend(
            renames
                .into_iter()
                .map(|rename| ImportStatement::new(format!("{prefix}.{rename}"))),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use pretty_assertions::assert_eq;

    fn set(lines: &[&str]) -> ImportSet {
        lines.iter().map(|line| ImportStatement::new(*line)).collect()
    }

    #[test]
    fn expand_preserves_relative_order() {
        let mut imports = set(&[
            "import a.X",
            "import b.{C, D}",
            "import c.{E => F, G}",
            "import d._",
        ]);
        imports.expand();
        assert_eq!(
            imports.lines(),
            vec![
                "import a.X",
                "import b.C",
                "import b.D",
                "import c.{E => F, G}",
                "import d._",
            ]
        );
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut imports = set(&["import a.B", "import c.D", "import a.B", "import e.F"]);
        imports.dedup();
        assert_eq!(imports.lines(), vec!["import a.B", "import c.D", "import e.F"]);
    }

    #[test]
    fn remove_drops_exact_matches_only() {
        let mut imports = set(&["import scala.Some", "import scala.Some.x", "import scala.Some"]);
        imports.remove("import scala.Some");
        assert_eq!(imports.lines(), vec!["import scala.Some.x"]);
    }

    #[test]
    fn remove_unused_uses_code_body() {
        let config = EngineConfig::default();
        let filter = UsageFilter::new(&config);
        let mut imports = set(&["import x.y.Baz", "import x.y.Qux"]);
        imports.remove_unused("foo.bar(Baz)", &filter);
        assert_eq!(imports.lines(), vec!["import x.y.Baz"]);
    }

    #[test]
    fn sort_orders_tiers_then_text() {
        let config = EngineConfig::default();
        let ordering = ImportOrdering::new(&config);
        let mut imports = set(&[
            "import scala.util.Try",
            "import play.api.mvc.Action",
            "import models.User",
            "import java.io.File",
            "import controllers.Base",
            "import com.google.Guava",
        ]);
        imports.sort(&ordering);
        assert_eq!(
            imports.lines(),
            vec![
                "import controllers.Base",
                "import models.User",
                "import com.google.Guava",
                "import play.api.mvc.Action",
                "import java.io.File",
                "import scala.util.Try",
            ]
        );
    }

    #[test]
    fn compact_builds_brace_group_below_threshold() {
        let members = ["A", "B", "C", "D", "E", "F", "G"];
        let mut imports: ImportSet = members
            .iter()
            .map(|m| ImportStatement::new(format!("import models.{m}")))
            .collect();
        imports.compact(8);
        assert_eq!(
            imports.lines(),
            vec!["import models.{A, B, C, D, E, F, G}"]
        );
    }

    #[test]
    fn compact_collapses_to_wildcard_at_threshold() {
        let members = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let mut imports: ImportSet = members
            .iter()
            .map(|m| ImportStatement::new(format!("import models.{m}")))
            .collect();
        imports.compact(8);
        assert_eq!(imports.lines(), vec!["import models._"]);
    }

    #[test]
    fn compact_appends_renames_after_group() {
        let mut imports = set(&[
            "import a.B",
            "import a.{C => D}",
            "import a.E",
            "import b.F",
            "import c.{G => H}",
            "import c.{I => J}",
        ]);
        imports.compact(8);
        assert_eq!(
            imports.lines(),
            vec![
                "import a.{B, E}",
                "import a.{C => D}",
                "import b.F",
                "import c.{G => H}",
                "import c.{I => J}",
            ]
        );
    }

    #[test]
    fn compact_places_wildcard_last_in_group() {
        let mut imports = set(&["import a.B", "import a._", "import a.c"]);
        imports.compact(8);
        assert_eq!(imports.lines(), vec!["import a.{B, c, _}"]);
    }

    #[test]
    fn layout_separates_tiers_once() {
        let config = EngineConfig::default();
        let ordering = ImportOrdering::new(&config);
        let imports = set(&[
            "import models.User",
            "import play.api.mvc.Action",
            "import org.joda.time.DateTime",
            "import scala.util.Try",
        ]);
        assert_eq!(
            imports.layout(&ordering),
            vec![
                "import models.User",
                "",
                "import play.api.mvc.Action",
                "import org.joda.time.DateTime",
                "",
                "import scala.util.Try",
            ]
        );
    }

    #[test]
    fn layout_handles_project_straight_to_language() {
        let config = EngineConfig::default();
        let ordering = ImportOrdering::new(&config);
        let imports = set(&["import models.User", "import scala.util.Try"]);
        assert_eq!(
            imports.layout(&ordering),
            vec!["import models.User", "", "import scala.util.Try"]
        );
    }

    #[test]
    fn replace_swaps_in_place_without_duplicates() {
        let mut imports = set(&["import a.B", "import models._", "import z.Y"]);
        let replaced = imports.replace(
            &ImportStatement::new("import models._"),
            &[
                ImportStatement::new("import models.User"),
                ImportStatement::new("import a.B"),
            ],
        );
        assert!(replaced);
        assert_eq!(
            imports.lines(),
            vec!["import a.B", "import models.User", "import z.Y"]
        );
    }
}
