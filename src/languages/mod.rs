pub mod catalog;
pub mod javascript;
pub mod typescript;

pub use catalog::{QueryCatalog, QueryPattern};

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StructureError};
use crate::structure::models::ElementKind;

/// Languages the extractor knows how to analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Tsx,
}

impl LanguageId {
    pub const ALL: [LanguageId; 3] = [LanguageId::JavaScript, LanguageId::TypeScript, LanguageId::Tsx];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::Tsx => "tsx",
        }
    }

    /// Maps a file extension (without the dot) to a language
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(LanguageId::JavaScript),
            "ts" | "mts" | "cts" => Some(LanguageId::TypeScript),
            "tsx" => Some(LanguageId::Tsx),
            _ => None,
        }
    }

    /// Looks at the path's extension only; the file is never touched.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" => Ok(LanguageId::JavaScript),
            "typescript" => Ok(LanguageId::TypeScript),
            other => {
                Self::from_extension(other).ok_or_else(|| StructureError::UnsupportedLanguage(s.to_string()))
            }
        }
    }
}

impl TryFrom<String> for LanguageId {
    type Error = StructureError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A named tree-sitter query pattern.
///
/// Each pattern declares exactly one `@definition` capture, whose span becomes
/// the element's line range, and optionally a `@name` capture.
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub name: &'static str,
    pub kind: ElementKind,
    pub source: &'static str,
}

impl PatternSpec {
    pub const fn function(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            kind: ElementKind::Function,
            source,
        }
    }

    pub const fn class(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            kind: ElementKind::Class,
            source,
        }
    }
}

pub trait LanguageGrammar: Send + Sync {
    fn id(&self) -> LanguageId;
    fn file_extensions(&self) -> &[&'static str];
    fn language(&self) -> tree_sitter::Language;
    fn function_patterns(&self) -> &'static [PatternSpec];
    fn class_patterns(&self) -> &'static [PatternSpec];

    fn name(&self) -> &'static str {
        self.id().as_str()
    }

    fn patterns(&self, kind: ElementKind) -> &'static [PatternSpec] {
        match kind {
            ElementKind::Function => self.function_patterns(),
            ElementKind::Class => self.class_patterns(),
        }
    }
}

/// A loaded grammar: the tree-sitter language plus its lazily compiled queries
pub struct Grammar {
    definition: Arc<dyn LanguageGrammar>,
    language: tree_sitter::Language,
    catalog: QueryCatalog,
}

impl Grammar {
    /// Loads the native grammar and checks that a parser accepts it.
    pub fn load(definition: Arc<dyn LanguageGrammar>) -> Result<Self> {
        let language = definition.language();
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| StructureError::grammar_load(definition.name(), e))?;

        Ok(Self {
            definition,
            language,
            catalog: QueryCatalog::new(),
        })
    }

    pub fn id(&self) -> LanguageId {
        self.definition.id()
    }

    pub fn name(&self) -> &'static str {
        self.definition.name()
    }

    pub fn language(&self) -> &tree_sitter::Language {
        &self.language
    }

    pub fn definition(&self) -> &dyn LanguageGrammar {
        self.definition.as_ref()
    }

    /// Compiled patterns for `kind`, compiled on first use
    pub fn patterns(&self, kind: ElementKind) -> Result<Arc<[QueryPattern]>> {
        self.catalog.patterns_for(self, kind)
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar").field("language", &self.name()).finish()
    }
}

struct GrammarSlot {
    definition: Arc<dyn LanguageGrammar>,
    loaded: OnceCell<Result<Arc<Grammar>>>,
}

/// Maps language ids to grammars; each grammar is loaded at most once.
///
/// Load failures are cached too, so a broken grammar stays broken for the
/// lifetime of the registry without affecting other languages.
pub struct GrammarRegistry {
    slots: HashMap<LanguageId, GrammarSlot>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Arc::new(javascript::JavaScriptGrammar));
        registry.register(Arc::new(typescript::TypeScriptGrammar));
        registry.register(Arc::new(typescript::TsxGrammar));

        registry
    }

    pub fn empty() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub fn register(&mut self, definition: Arc<dyn LanguageGrammar>) {
        self.slots.insert(
            definition.id(),
            GrammarSlot {
                definition,
                loaded: OnceCell::new(),
            },
        );
    }

    pub fn resolve(&self, language: LanguageId) -> Result<Arc<Grammar>> {
        let slot = self
            .slots
            .get(&language)
            .ok_or_else(|| StructureError::UnsupportedLanguage(language.to_string()))?;

        slot.loaded
            .get_or_init(|| {
                tracing::debug!("Loading {} grammar", language);
                match Grammar::load(slot.definition.clone()) {
                    Ok(grammar) => Ok(Arc::new(grammar)),
                    Err(e) => {
                        tracing::warn!("{}", e);
                        Err(e)
                    }
                }
            })
            .clone()
    }

    /// Resolves the grammar registered for the path's extension
    pub fn resolve_for_file(&self, path: &Path) -> Result<Arc<Grammar>> {
        let language = LanguageId::from_path(path)
            .ok_or_else(|| StructureError::UnsupportedLanguage(path.display().to_string()))?;
        self.resolve(language)
    }

    pub fn supported_languages(&self) -> Vec<LanguageId> {
        let mut languages: Vec<LanguageId> = self.slots.keys().copied().collect();
        languages.sort();
        languages
    }

    pub fn is_supported(&self, language: LanguageId) -> bool {
        self.slots.contains_key(&language)
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new() {
        let registry = GrammarRegistry::new();
        assert_eq!(
            registry.supported_languages(),
            vec![LanguageId::JavaScript, LanguageId::TypeScript, LanguageId::Tsx]
        );
    }

    #[test]
    fn test_resolve_javascript() {
        let registry = GrammarRegistry::new();
        let grammar = registry.resolve(LanguageId::JavaScript).unwrap();
        assert_eq!(grammar.name(), "javascript");
        assert_eq!(grammar.id(), LanguageId::JavaScript);
    }

    #[test]
    fn test_resolve_is_cached() {
        let registry = GrammarRegistry::new();
        let first = registry.resolve(LanguageId::TypeScript).unwrap();
        let second = registry.resolve(LanguageId::TypeScript).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_resolve_loads_once() {
        use rayon::prelude::*;

        let registry = GrammarRegistry::new();
        let grammars: Vec<Arc<Grammar>> = (0..32)
            .into_par_iter()
            .map(|i| registry.resolve(LanguageId::ALL[i % LanguageId::ALL.len()]).unwrap())
            .collect();

        for (i, grammar) in grammars.iter().enumerate() {
            let first = &grammars[i % LanguageId::ALL.len()];
            assert!(Arc::ptr_eq(grammar, first), "{} loaded twice", grammar.name());
        }
    }

    #[test]
    fn test_resolve_unregistered() {
        let registry = GrammarRegistry::empty();
        let err = registry.resolve(LanguageId::Tsx).unwrap_err();
        assert_eq!(err, StructureError::UnsupportedLanguage("tsx".to_string()));
        assert!(!registry.is_supported(LanguageId::Tsx));
    }

    #[test]
    fn test_resolve_for_file() {
        let registry = GrammarRegistry::new();
        let grammar = registry.resolve_for_file(Path::new("src/App.tsx")).unwrap();
        assert_eq!(grammar.id(), LanguageId::Tsx);

        let err = registry.resolve_for_file(Path::new("main.rs")).unwrap_err();
        assert!(matches!(err, StructureError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_language_id_from_str() {
        assert_eq!("javascript".parse::<LanguageId>().unwrap(), LanguageId::JavaScript);
        assert_eq!("TypeScript".parse::<LanguageId>().unwrap(), LanguageId::TypeScript);
        assert_eq!("js".parse::<LanguageId>().unwrap(), LanguageId::JavaScript);
        assert_eq!("tsx".parse::<LanguageId>().unwrap(), LanguageId::Tsx);
        assert_eq!(
            "not-a-real-language".parse::<LanguageId>().unwrap_err(),
            StructureError::UnsupportedLanguage("not-a-real-language".to_string())
        );
        assert!("".parse::<LanguageId>().is_err());
    }

    #[test]
    fn test_language_id_from_path() {
        assert_eq!(LanguageId::from_path(Path::new("index.mjs")), Some(LanguageId::JavaScript));
        assert_eq!(LanguageId::from_path(Path::new("lib/util.ts")), Some(LanguageId::TypeScript));
        assert_eq!(LanguageId::from_path(Path::new("View.TSX")), Some(LanguageId::Tsx));
        assert_eq!(LanguageId::from_path(Path::new("Makefile")), None);
        assert_eq!(LanguageId::from_path(Path::new("data.json")), None);
    }

    #[test]
    fn test_language_id_display_round_trip() {
        for id in LanguageId::ALL {
            assert_eq!(id.to_string().parse::<LanguageId>().unwrap(), id);
        }
    }

    #[test]
    fn test_grammar_extensions() {
        let registry = GrammarRegistry::new();
        let grammar = registry.resolve(LanguageId::JavaScript).unwrap();
        assert!(grammar.definition().file_extensions().contains(&"jsx"));
    }
}
