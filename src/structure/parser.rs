use crate::error::{Result, StructureError};
use crate::languages::{Grammar, LanguageId};

/// Binds a grammar to a fresh tree-sitter parser for every call.
///
/// tree-sitter parsers are not shared between threads, so nothing is pooled.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse<'src>(&self, grammar: &Grammar, content: &'src str) -> Result<SyntaxTree<'src>> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(grammar.language())
            .map_err(|e| StructureError::parse(grammar.name(), e))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| StructureError::parse(grammar.name(), "parser produced no tree"))?;

        let parsed = SyntaxTree {
            tree,
            source: content,
            language: grammar.id(),
        };

        if parsed.has_errors() {
            tracing::debug!(
                "{} source contains syntax errors; extraction will be partial",
                grammar.name()
            );
        }

        Ok(parsed)
    }
}

/// The parse result for one source text.
///
/// Nodes borrowed from the tree cannot outlive it.
pub struct SyntaxTree<'src> {
    tree: tree_sitter::Tree,
    source: &'src str,
    language: LanguageId,
}

impl<'src> SyntaxTree<'src> {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn source_bytes(&self) -> &'src [u8] {
        self.source.as_bytes()
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// True when the tree contains ERROR or MISSING nodes
    pub fn has_errors(&self) -> bool {
        self.root_node().has_error()
    }
}

impl std::fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.language)
            .field("root", &self.root_node().kind())
            .finish()
    }
}
