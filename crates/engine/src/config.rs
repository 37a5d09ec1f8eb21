use serde::{Deserialize, Serialize};

/// A literal substring substitution applied to every import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Static tables that drive import normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Substitutions, applied in list order
    pub rewrites: Vec<RewriteRule>,

    /// Exact import statements that are always dropped
    pub removes: Vec<String>,

    /// Imports that are never referenced by name but change behavior when present
    /// (implicit conversions, execution contexts, DSL enablers)
    pub side_effect_imports: Vec<String>,

    /// Leading package segments of the language runtime (sorted last)
    pub language_prefixes: Vec<String>,

    /// Leading package segments of third-party libraries (sorted between project and language)
    pub external_prefixes: Vec<String>,

    /// A prefix group with at least this many members collapses to a wildcard
    pub group_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rewrites: vec![
                RewriteRule::new(" _root_.util", " util"),
                RewriteRule::new(" Tap._", " util.Tap._"),
                RewriteRule::new(" DataPoint.DataType", " models.DataPoint.DataType"),
                RewriteRule::new(" action.", " controllers.action."),
                RewriteRule::new(" helpers.", " controllers.helpers."),
                RewriteRule::new(" concurrent.", " scala.concurrent."),
                RewriteRule::new(" collection.", " scala.collection."),
            ],
            removes: vec!["import scala.Some".to_string()],
            side_effect_imports: vec![
                "scala.collection.JavaConversions".to_string(),
                "scala.concurrent.ExecutionContext.Implicits".to_string(),
                "scala.language.implicitConversions".to_string(),
                "scala.sys.process".to_string(),
                "play.api.Play.current".to_string(),
            ],
            language_prefixes: vec![
                "scala".to_string(),
                "scalaz".to_string(),
                "java".to_string(),
                "javax".to_string(),
            ],
            external_prefixes: vec![
                "play".to_string(),
                "org".to_string(),
                "com".to_string(),
                "net".to_string(),
            ],
            group_threshold: 8,
        }
    }
}

impl EngineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.group_threshold < 2 {
            return Err(format!(
                "group_threshold ({}) must be at least 2",
                self.group_threshold
            ));
        }

        if let Some(rule) = self.rewrites.iter().find(|rule| rule.from.is_empty()) {
            return Err(format!(
                "rewrite rule to {:?} has an empty `from` pattern",
                rule.to
            ));
        }

        let blank_prefix = self
            .language_prefixes
            .iter()
            .chain(&self.external_prefixes)
            .any(|prefix| prefix.trim().is_empty());
        if blank_prefix {
            return Err("tier prefixes must not be blank".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig {
            group_threshold: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.group_threshold = 8;
        config.rewrites.push(RewriteRule::new("", "x"));
        assert!(config.validate().is_err());

        config.rewrites.pop();
        config.external_prefixes.push("  ".to_string());
        assert!(config.validate().is_err());

        config.external_prefixes.pop();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"group_threshold": 4}"#).expect("parse config");
        assert_eq!(config.group_threshold, 4);
        assert_eq!(config.removes, vec!["import scala.Some".to_string()]);
    }
}
