use crate::error::{Result, SessionError};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Value,
    Type,
    /// The pattern matched without a recognizable `kind` capture
    Unknown,
}

impl DiagnosticKind {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("value") => Self::Value,
            Some("type") => Self::Type,
            _ => Self::Unknown,
        }
    }
}

/// A missing symbol reported by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub symbol: String,
}

/// Pulls missing-symbol diagnostics out of compiler output
#[derive(Debug, Clone)]
pub struct DiagnosticMatcher {
    pattern: Regex,
}

impl DiagnosticMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)?;
        if !pattern.capture_names().flatten().any(|name| name == "symbol") {
            return Err(SessionError::invalid_config(
                "diagnostic_pattern must define a `symbol` capture group",
            ));
        }
        Ok(Self { pattern })
    }

    /// Unique diagnostics in order of first appearance.
    pub fn scan(&self, output: &str) -> Vec<Diagnostic> {
        let mut found: Vec<Diagnostic> = Vec::new();
        for line in output.lines() {
            for caps in self.pattern.captures_iter(line) {
                let Some(symbol) = caps.name("symbol") else {
                    continue;
                };
                let diagnostic = Diagnostic {
                    kind: DiagnosticKind::parse(caps.name("kind").map(|m| m.as_str())),
                    symbol: symbol.as_str().to_string(),
                };
                if !found.contains(&diagnostic) {
                    found.push(diagnostic);
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;

    fn matcher() -> DiagnosticMatcher {
        DiagnosticMatcher::new(&OptimizerConfig::default().diagnostic_pattern).expect("pattern")
    }

    #[test]
    fn extracts_capitalized_missing_symbols() {
        let output = "\
[info] Compiling 2 Scala sources
[error] /app/controllers/Users.scala:12: not found: type User
[error] /app/controllers/Users.scala:14: not found: value Account
[error] /app/controllers/Users.scala:15: not found: value helper
[error] /app/controllers/Users.scala:16: not found: type User
[error] Total time: 3 s";

        let found = matcher().scan(output);
        assert_eq!(
            found,
            vec![
                Diagnostic {
                    kind: DiagnosticKind::Type,
                    symbol: "User".to_string()
                },
                Diagnostic {
                    kind: DiagnosticKind::Value,
                    symbol: "Account".to_string()
                },
            ]
        );
    }

    #[test]
    fn pattern_must_capture_symbol() {
        assert!(matches!(
            DiagnosticMatcher::new("not found: (value|type)"),
            Err(SessionError::InvalidConfig(_))
        ));
        assert!(matches!(
            DiagnosticMatcher::new("not found: ("),
            Err(SessionError::InvalidPattern(_))
        ));
    }
}
