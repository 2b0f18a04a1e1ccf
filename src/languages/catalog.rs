use std::sync::Arc;

use once_cell::sync::OnceCell;
use tree_sitter::{CaptureQuantifier, Query};

use super::{Grammar, PatternSpec};
use crate::error::{Result, StructureError};
use crate::structure::models::ElementKind;

const DEFINITION_CAPTURE: &str = "definition";
const NAME_CAPTURE: &str = "name";

/// A compiled [`PatternSpec`] with its capture roles resolved
pub struct QueryPattern {
    name: &'static str,
    kind: ElementKind,
    query: Query,
    definition_capture: u32,
    name_capture: Option<u32>,
}

impl QueryPattern {
    /// Compiles a single pattern.
    ///
    /// The source must hold exactly one pattern, capture `@definition` exactly
    /// once, and use no captures other than `@definition` and `@name`.
    pub fn compile(language: &tree_sitter::Language, spec: &PatternSpec) -> std::result::Result<Self, String> {
        let query = Query::new(language, spec.source).map_err(|e| format!("pattern `{}`: {}", spec.name, e))?;

        if query.pattern_count() != 1 {
            return Err(format!(
                "pattern `{}` holds {} patterns, expected 1",
                spec.name,
                query.pattern_count()
            ));
        }

        if let Some(other) = query
            .capture_names()
            .iter()
            .find(|name| **name != DEFINITION_CAPTURE && **name != NAME_CAPTURE)
        {
            return Err(format!("pattern `{}` uses unknown capture @{}", spec.name, other));
        }

        let definition_capture = query
            .capture_index_for_name(DEFINITION_CAPTURE)
            .ok_or_else(|| format!("pattern `{}` has no @{} capture", spec.name, DEFINITION_CAPTURE))?;

        let quantifier = query.capture_quantifiers(0)[definition_capture as usize];
        if quantifier != CaptureQuantifier::One {
            return Err(format!(
                "pattern `{}` must capture @{} exactly once",
                spec.name, DEFINITION_CAPTURE
            ));
        }

        Ok(Self {
            name: spec.name,
            kind: spec.kind,
            name_capture: query.capture_index_for_name(NAME_CAPTURE),
            definition_capture,
            query,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn definition_capture(&self) -> u32 {
        self.definition_capture
    }

    pub fn name_capture(&self) -> Option<u32> {
        self.name_capture
    }
}

impl std::fmt::Debug for QueryPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPattern")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Per-grammar cache of compiled patterns, one slot per element kind
#[derive(Default)]
pub struct QueryCatalog {
    functions: OnceCell<Result<Arc<[QueryPattern]>>>,
    classes: OnceCell<Result<Arc<[QueryPattern]>>>,
}

impl QueryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns_for(&self, grammar: &Grammar, kind: ElementKind) -> Result<Arc<[QueryPattern]>> {
        let slot = match kind {
            ElementKind::Function => &self.functions,
            ElementKind::Class => &self.classes,
        };

        slot.get_or_init(|| Self::compile_all(grammar, kind)).clone()
    }

    fn compile_all(grammar: &Grammar, kind: ElementKind) -> Result<Arc<[QueryPattern]>> {
        let specs = grammar.definition().patterns(kind);
        tracing::debug!("Compiling {} {} patterns for {}", specs.len(), kind, grammar.name());

        let mut compiled = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.kind != kind {
                return Err(StructureError::grammar_load(
                    grammar.name(),
                    format!("pattern `{}` is registered as {} but declared {}", spec.name, kind, spec.kind),
                ));
            }
            let pattern = QueryPattern::compile(grammar.language(), spec).map_err(|reason| {
                tracing::warn!("Invalid {} query for {}: {}", kind, grammar.name(), reason);
                StructureError::grammar_load(grammar.name(), reason)
            })?;
            compiled.push(pattern);
        }

        Ok(Arc::from(compiled))
    }
}
