use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::import_set::ImportSet;
use crate::ordering::ImportOrdering;
use crate::source::SourceFile;
use crate::usage::UsageFilter;

/// Runs the full clean-up pipeline over an import set
#[derive(Debug, Clone)]
pub struct ImportNormalizer {
    config: EngineConfig,
}

impl ImportNormalizer {
    /// Create a normalizer with validated configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().map_err(EngineError::invalid_config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ordering(&self) -> ImportOrdering<'_> {
        ImportOrdering::new(&self.config)
    }

    /// Expand, rewrite, remove blacklisted, sort, dedup, drop unused, compact.
    ///
    /// Returns the import block lines, blank tier separators included.
    pub fn clean(&self, imports: &mut ImportSet, code: &str) -> Vec<String> {
        imports.expand();
        for rule in &self.config.rewrites {
            imports.rewrite(&rule.from, &rule.to);
        }
        for exact in &self.config.removes {
            imports.remove(exact);
        }

        let ordering = self.ordering();
        imports.sort(&ordering);
        imports.dedup();
        imports.remove_unused(code, &UsageFilter::new(&self.config));
        imports.compact(self.config.group_threshold);
        imports.layout(&ordering)
    }

    /// Cleans the file's imports and returns the rendered content.
    pub fn normalize(&self, source: &mut SourceFile) -> String {
        let code = source.code_text();
        let lines = self.clean(&mut source.imports, &code);
        source.render_with(&lines)
    }
}

impl Default for ImportNormalizer {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }
}
