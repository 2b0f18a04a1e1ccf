use super::{javascript, LanguageGrammar, LanguageId, PatternSpec};

// Class names are `type_identifier` in the TypeScript grammar. Interfaces are
// deliberately absent: they are not classes.
static CLASS_PATTERNS: &[PatternSpec] = &[
    PatternSpec::class(
        "class_declaration",
        "(class_declaration name: (type_identifier) @name) @definition",
    ),
    PatternSpec::class(
        "abstract_class_declaration",
        "(abstract_class_declaration name: (type_identifier) @name) @definition",
    ),
    PatternSpec::class(
        "exported_class_declaration",
        r#"
        (export_statement
            declaration: (class_declaration
                name: (type_identifier) @name) @definition)
        "#,
    ),
    PatternSpec::class(
        "default_exported_class_declaration",
        r#"
        (export_statement
            "default"
            declaration: (class_declaration
                name: (type_identifier) @name) @definition)
        "#,
    ),
    PatternSpec::class(
        "class_expression_declarator",
        r#"
        (variable_declarator
            name: (identifier) @name
            value: (class)) @definition
        "#,
    ),
];

pub struct TypeScriptGrammar;

impl LanguageGrammar for TypeScriptGrammar {
    fn id(&self) -> LanguageId {
        LanguageId::TypeScript
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["ts", "mts", "cts"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    }

    fn function_patterns(&self) -> &'static [PatternSpec] {
        javascript::FUNCTION_PATTERNS
    }

    fn class_patterns(&self) -> &'static [PatternSpec] {
        CLASS_PATTERNS
    }
}

/// TypeScript with JSX; same node shapes as TypeScript for our patterns
pub struct TsxGrammar;

impl LanguageGrammar for TsxGrammar {
    fn id(&self) -> LanguageId {
        LanguageId::Tsx
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["tsx"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_typescript::LANGUAGE_TSX.into()
    }

    fn function_patterns(&self) -> &'static [PatternSpec] {
        javascript::FUNCTION_PATTERNS
    }

    fn class_patterns(&self) -> &'static [PatternSpec] {
        CLASS_PATTERNS
    }
}
