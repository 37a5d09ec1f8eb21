use crate::import_set::ImportSet;
use crate::statement::ImportStatement;

/// Line terminator a file was read with; rendering writes it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// `CrLf` when the content uses `\r\n` anywhere.
    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// A source file split into header, import block, and code body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// First line of the file, kept verbatim
    pub header: String,
    pub imports: ImportSet,
    /// Everything from the first non-import, non-blank line on
    pub code: Vec<String>,
    pub line_ending: LineEnding,
}

impl SourceFile {
    /// Splits raw file content.
    ///
    /// Line 1 is the header. Lines starting with the `import` keyword are
    /// collected wherever they appear. Blank lines are dropped until the first
    /// code line; after it every line, blank or not, belongs to the body.
    pub fn parse(content: &str) -> Self {
        let mut lines = content.lines();
        let header = lines.next().unwrap_or_default().to_string();

        let mut imports = ImportSet::new();
        let mut code = Vec::new();
        let mut in_body = false;

        for line in lines {
            if ImportStatement::is_import_line(line) {
                imports.push(ImportStatement::new(line.trim_end()));
            } else if !in_body && line.trim().is_empty() {
                continue;
            } else {
                in_body = true;
                code.push(line.to_string());
            }
        }

        Self {
            header,
            imports,
            code,
            line_ending: LineEnding::detect(content),
        }
    }

    /// Code body joined with newlines, as the usage filter sees it.
    pub fn code_text(&self) -> String {
        self.code.join("\n")
    }

    /// Renders the file with its current import statements.
    pub fn render(&self) -> String {
        self.render_with(&self.imports.lines())
    }

    /// Renders the file with an explicit import block (may contain blank separators).
    pub fn render_with<S: AsRef<str>>(&self, import_lines: &[S]) -> String {
        let eol = self.line_ending.as_str();
        let mut out = String::with_capacity(
            self.header.len() + self.code.iter().map(|l| l.len() + 2).sum::<usize>() + 64,
        );
        out.push_str(&self.header);
        out.push_str(eol);
        out.push_str(eol);

        if !import_lines.is_empty() {
            for (idx, line) in import_lines.iter().enumerate() {
                if idx > 0 {
                    out.push_str(eol);
                }
                out.push_str(line.as_ref());
            }
            out.push_str(eol);
            out.push_str(eol);
        }

        out.push_str(&self.code.join(eol));
        out.push_str(eol);
        out
    }

    /// Same header and body with a different import set.
    pub fn with_imports(&self, imports: ImportSet) -> Self {
        Self {
            header: self.header.clone(),
            imports,
            code: self.code.clone(),
            line_ending: self.line_ending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "package app\n\nimport b.Two\n\nimport a.One\n\nobject Main {\n\n  val x = 1\nimport late.Three\n}\n";

    #[test]
    fn splits_header_imports_and_body() {
        let file = SourceFile::parse(SAMPLE);
        assert_eq!(file.header, "package app");
        assert_eq!(
            file.imports.lines(),
            vec!["import b.Two", "import a.One", "import late.Three"]
        );
        assert_eq!(file.code, vec!["object Main {", "", "  val x = 1", "}"]);
    }

    #[test]
    fn empty_content_yields_empty_file() {
        let file = SourceFile::parse("");
        assert_eq!(file, SourceFile::default());
    }

    #[test]
    fn renders_original_layout() {
        let file = SourceFile::parse("package app\nimport a.One\nval x = One\n");
        assert_eq!(file.render(), "package app\n\nimport a.One\n\nval x = One\n");

        let no_imports = SourceFile::parse("package app\nval x = 1\n");
        assert_eq!(no_imports.render(), "package app\n\nval x = 1\n");
    }

    #[test]
    fn keeps_crlf_line_endings() {
        let content = "package app\r\n\r\nimport a.One\r\n\r\nval x = One\r\n";
        let file = SourceFile::parse(content);
        assert_eq!(file.line_ending, LineEnding::CrLf);
        assert_eq!(file.imports.lines(), vec!["import a.One"]);
        assert_eq!(file.code, vec!["val x = One"]);
        assert_eq!(file.render(), content);
    }

    #[test]
    fn render_is_stable_under_reparse() {
        let file = SourceFile::parse(SAMPLE);
        let rendered = file.render_with(&["import a.One", "", "import scala.Two"]);
        let reparsed = SourceFile::parse(&rendered);
        assert_eq!(reparsed.code, file.code);
        assert_eq!(reparsed.render_with(&["import a.One", "", "import scala.Two"]), rendered);
    }
}
