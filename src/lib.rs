//! Structural code extraction for JavaScript and TypeScript.
//!
//! Parses one source text with tree-sitter and returns the functions and
//! classes it declares, each with a 1-based inclusive line range.

pub mod config;
pub mod error;
pub mod languages;
pub mod structure;

use once_cell::sync::Lazy;

pub use config::AnalyzerConfig;
pub use error::{ConfigError, Result, StructureError};
pub use languages::{Grammar, GrammarRegistry, LanguageGrammar, LanguageId, PatternSpec, QueryPattern};
pub use structure::{
    CodeElementInfo, ElementKind, ExtractionResult, MatchExtractor, Parser, ResultAssembler, SyntaxTree,
    ANONYMOUS_FUNCTION,
};

/// Global grammar registry instance (lazily initialized)
pub static REGISTRY: Lazy<GrammarRegistry> = Lazy::new(GrammarRegistry::new);

/// Runs the full pipeline: grammar, parse, queries, extraction, assembly.
///
/// Holds no per-call state, so one analyzer can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct StructureAnalyzer {
    config: AnalyzerConfig,
}

impl StructureAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, content: &str, language: LanguageId) -> Result<ExtractionResult> {
        if !self.config.is_enabled(language) {
            return Err(StructureError::UnsupportedLanguage(language.to_string()));
        }

        let grammar = REGISTRY.resolve(language)?;
        let function_patterns = grammar.patterns(ElementKind::Function)?;
        let class_patterns = grammar.patterns(ElementKind::Class)?;

        let tree = Parser::new().parse(&grammar, content)?;

        let extractor = MatchExtractor::new().with_match_limit(self.config.match_limit);
        let functions = extractor.extract(&tree, &function_patterns);
        let classes = extractor.extract(&tree, &class_patterns);

        let result = ResultAssembler::new().assemble(functions, classes);
        tracing::debug!(
            "Extracted {} functions and {} classes from {} source",
            result.functions.len(),
            result.classes.len(),
            language
        );

        Ok(result)
    }

    /// Like [`analyze`](Self::analyze), with the language given by name or extension
    pub fn analyze_named(&self, content: &str, language: &str) -> Result<ExtractionResult> {
        self.analyze(content, language.parse()?)
    }
}

/// Analyzes `content` with the default configuration.
///
/// `language` is a language name (`"javascript"`, `"typescript"`, `"tsx"`) or
/// a file extension such as `"js"` or `"ts"`.
pub fn analyze_structure(content: &str, language: &str) -> Result<ExtractionResult> {
    StructureAnalyzer::new().analyze_named(content, language)
}
