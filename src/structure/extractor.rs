use tree_sitter::{QueryCursor, QueryMatch, StreamingIterator};

use crate::languages::QueryPattern;
use crate::structure::models::{ElementKind, RawElement, Span};
use crate::structure::parser::SyntaxTree;

/// One firing of a pattern against the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub pattern: &'static str,
    pub kind: ElementKind,
    pub name: Option<String>,
    pub definition: Span,
}

impl Match {
    fn read(pattern: &QueryPattern, m: &QueryMatch<'_, '_>, source: &[u8]) -> Option<Self> {
        let mut definition = None;
        let mut name = None;

        for capture in m.captures {
            if capture.index == pattern.definition_capture() {
                definition = Some(Span::from_node(&capture.node));
            } else if Some(capture.index) == pattern.name_capture() {
                name = capture.node.utf8_text(source).ok().map(str::to_string);
            }
        }

        Some(Self {
            pattern: pattern.name(),
            kind: pattern.kind(),
            name,
            definition: definition?,
        })
    }

    /// Nameless functions become anonymous elements; nameless classes yield nothing.
    pub fn into_raw(self) -> Option<RawElement> {
        if self.kind == ElementKind::Class && self.name.is_none() {
            return None;
        }
        Some(RawElement::new(self.kind, self.name, self.definition))
    }
}

/// Runs compiled patterns over a syntax tree and emits one raw element per match
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchExtractor {
    match_limit: Option<u32>,
}

impl MatchExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_limit(mut self, limit: Option<u32>) -> Self {
        self.match_limit = limit;
        self
    }

    pub fn new_cursor(&self) -> QueryCursor {
        let mut cursor = QueryCursor::new();
        if let Some(limit) = self.match_limit {
            cursor.set_match_limit(limit);
        }
        cursor
    }

    /// Lazily yields the matches of a single pattern.
    ///
    /// Each call starts a new pass over the tree; the cursor holds the only
    /// iteration state.
    pub fn run_pattern<'c>(
        tree: &'c SyntaxTree<'_>,
        pattern: &'c QueryPattern,
        cursor: &'c mut QueryCursor,
    ) -> impl Iterator<Item = Match> + 'c {
        let source: &'c [u8] = tree.source_bytes();
        cursor
            .matches(pattern.query(), tree.root_node(), source)
            .map_deref(move |m| Match::read(pattern, m, source))
            .flatten()
    }

    pub fn extract(&self, tree: &SyntaxTree<'_>, patterns: &[QueryPattern]) -> Vec<RawElement> {
        let mut elements = Vec::new();

        for pattern in patterns {
            let mut cursor = self.new_cursor();
            let before = elements.len();

            for m in Self::run_pattern(tree, pattern, &mut cursor) {
                match m.into_raw() {
                    Some(element) => elements.push(element),
                    None => tracing::debug!(
                        "Skipping nameless {} matched by `{}`",
                        pattern.kind(),
                        pattern.name()
                    ),
                }
            }

            if cursor.did_exceed_match_limit() {
                tracing::warn!(
                    "Pattern `{}` exceeded the match limit on {} source; results may be incomplete",
                    pattern.name(),
                    tree.language()
                );
            }

            tracing::trace!(
                pattern = pattern.name(),
                matches = elements.len() - before,
                "pattern applied"
            );
        }

        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::{GrammarRegistry, LanguageId, PatternSpec};
    use crate::structure::models::ANONYMOUS_FUNCTION;
    use crate::structure::parser::Parser;

    fn extract(language: LanguageId, source: &str, kind: ElementKind) -> Vec<RawElement> {
        let registry = GrammarRegistry::new();
        let grammar = registry.resolve(language).unwrap();
        let patterns = grammar.patterns(kind).unwrap();
        let tree = Parser::new().parse(&grammar, source).unwrap();
        MatchExtractor::new().extract(&tree, &patterns)
    }

    fn names(elements: &[RawElement]) -> Vec<&str> {
        elements.iter().map(|e| e.display_name()).collect()
    }

    #[test]
    fn test_function_declaration_span() {
        let elements = extract(
            LanguageId::JavaScript,
            "\nfunction add(a, b) {\n  return a + b;\n}\n",
            ElementKind::Function,
        );
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name.as_deref(), Some("add"));
        assert_eq!(elements[0].span.start_line(), 2);
        assert_eq!(elements[0].span.end_line(), 4);
    }

    #[test]
    fn test_exported_declaration_matches_twice_with_same_span() {
        let elements = extract(
            LanguageId::JavaScript,
            "export function load() {}",
            ElementKind::Function,
        );
        // plain and export-prefixed patterns both fire; assembly collapses them
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].span, elements[1].span);
    }

    #[test]
    fn test_anonymous_default_export() {
        let elements = extract(
            LanguageId::JavaScript,
            "export default function () {}",
            ElementKind::Function,
        );
        assert_eq!(names(&elements), vec!["[anonymous_function]"]);
        assert!(elements[0].name.is_none());
    }

    #[test]
    fn test_object_literal_methods() {
        let source = r#"
const api = {
  get() {},
  post: function () {},
  remove: () => {},
};
"#;
        let elements = extract(LanguageId::JavaScript, source, ElementKind::Function);
        let found = names(&elements);
        assert!(found.contains(&"get"));
        assert!(found.contains(&"post"));
        assert!(found.contains(&"remove"));
        assert!(!found.contains(&"api"));
    }

    #[test]
    fn test_quoted_and_computed_member_names() {
        let source = r#"
const headers = {
  'Content-Type': () => {},
  "x-y": function () {},
  "parse"() {},
  [key]: () => {},
};

class Collection {
  'quoted'() {}
  [Symbol.iterator]() {}
}
"#;
        let elements = extract(LanguageId::JavaScript, source, ElementKind::Function);
        let found = names(&elements);
        for name in ["Content-Type", "x-y", "parse", "quoted"] {
            assert!(found.contains(&name), "missing {}", name);
        }
        let mut anonymous: Vec<u32> = elements
            .iter()
            .filter(|e| e.name.is_none())
            .map(|e| e.span.start_line())
            .collect();
        anonymous.sort();
        assert_eq!(anonymous, vec![6, 11]);
    }

    #[test]
    fn test_generator_expressions() {
        let found = extract(
            LanguageId::JavaScript,
            "const g = function* () {};\nexport const h = function* named() {};\n",
            ElementKind::Function,
        );
        let found = names(&found);
        assert!(found.contains(&"g"));
        assert!(found.contains(&"h"));

        let elements = extract(LanguageId::JavaScript, "export default function* () {}", ElementKind::Function);
        assert_eq!(names(&elements), vec![ANONYMOUS_FUNCTION]);
    }

    #[test]
    fn test_class_methods() {
        let source = r#"
class Service {
  constructor() {}
  async fetch() {}
  #secret() {}
  static create() {}
}
"#;
        let found = extract(LanguageId::JavaScript, source, ElementKind::Function);
        let found = names(&found);
        for name in ["constructor", "fetch", "#secret", "create"] {
            assert!(found.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn test_nameless_class_match_is_dropped() {
        let registry = GrammarRegistry::new();
        let grammar = registry.resolve(LanguageId::JavaScript).unwrap();
        let spec = PatternSpec::class("anonymous_class", "(export_statement value: (class) @definition)");
        let pattern = QueryPattern::compile(grammar.language(), &spec).unwrap();
        let tree = Parser::new().parse(&grammar, "export default class {}").unwrap();

        let mut cursor = QueryCursor::new();
        let matches: Vec<Match> = MatchExtractor::run_pattern(&tree, &pattern, &mut cursor).collect();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].name.is_none());

        let elements = MatchExtractor::new().extract(&tree, std::slice::from_ref(&pattern));
        assert!(elements.is_empty());
    }

    #[test]
    fn test_run_pattern_is_restartable() {
        let registry = GrammarRegistry::new();
        let grammar = registry.resolve(LanguageId::JavaScript).unwrap();
        let patterns = grammar.patterns(ElementKind::Function).unwrap();
        let tree = Parser::new().parse(&grammar, "function a() {}\nfunction b() {}").unwrap();

        let extractor = MatchExtractor::new();
        let mut cursor = extractor.new_cursor();
        let first: Vec<Match> = MatchExtractor::run_pattern(&tree, &patterns[0], &mut cursor).collect();
        let second: Vec<Match> = MatchExtractor::run_pattern(&tree, &patterns[0], &mut cursor).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0].pattern, "function_declaration");
    }

    #[test]
    fn test_error_regions_degrade_to_partial_results() {
        let source = "function good() {}\nfunction bad( {\n";
        let elements = extract(LanguageId::JavaScript, source, ElementKind::Function);
        assert!(names(&elements).contains(&"good"));
    }

    #[test]
    fn test_typescript_interface_is_not_a_class() {
        let source = "interface Shape { area(): number }\nclass Circle {}\n";
        let elements = extract(LanguageId::TypeScript, source, ElementKind::Class);
        assert_eq!(names(&elements), vec!["Circle"]);
    }
}
