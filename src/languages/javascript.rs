use super::{LanguageGrammar, LanguageId, PatternSpec};

pub struct JavaScriptGrammar;

// Export-prefixed patterns capture the inner declaration as @definition, so a
// construct reached through several patterns always yields identical spans.
// Quoted member names report their contents; computed names carry no @name.
pub(crate) static FUNCTION_PATTERNS: &[PatternSpec] = &[
    PatternSpec::function(
        "function_declaration",
        "(function_declaration name: (identifier) @name) @definition",
    ),
    PatternSpec::function(
        "generator_function_declaration",
        "(generator_function_declaration name: (identifier) @name) @definition",
    ),
    PatternSpec::function(
        "function_expression_declarator",
        r#"
        (variable_declarator
            name: (identifier) @name
            value: [(function_expression) (generator_function)]) @definition
        "#,
    ),
    PatternSpec::function(
        "arrow_function_declarator",
        r#"
        (variable_declarator
            name: (identifier) @name
            value: (arrow_function)) @definition
        "#,
    ),
    PatternSpec::function(
        "exported_function_declaration",
        r#"
        (export_statement
            declaration: (function_declaration
                name: (identifier) @name) @definition)
        "#,
    ),
    PatternSpec::function(
        "exported_function_expression_declarator",
        r#"
        (export_statement
            declaration: [
                (lexical_declaration
                    (variable_declarator
                        name: (identifier) @name
                        value: [(function_expression) (generator_function)]) @definition)
                (variable_declaration
                    (variable_declarator
                        name: (identifier) @name
                        value: [(function_expression) (generator_function)]) @definition)
            ])
        "#,
    ),
    PatternSpec::function(
        "exported_arrow_function_declarator",
        r#"
        (export_statement
            declaration: [
                (lexical_declaration
                    (variable_declarator
                        name: (identifier) @name
                        value: (arrow_function)) @definition)
                (variable_declaration
                    (variable_declarator
                        name: (identifier) @name
                        value: (arrow_function)) @definition)
            ])
        "#,
    ),
    PatternSpec::function(
        "default_exported_function_declaration",
        r#"
        (export_statement
            "default"
            declaration: (function_declaration
                name: (identifier) @name) @definition)
        "#,
    ),
    PatternSpec::function(
        "default_exported_arrow_function",
        "(export_statement value: (arrow_function) @definition)",
    ),
    PatternSpec::function(
        "default_exported_function_expression",
        r#"
        (export_statement
            value: [
                (function_expression !name)
                (generator_function !name)
            ] @definition)
        "#,
    ),
    PatternSpec::function(
        "class_method",
        r#"
        (class_body
            (method_definition
                name: [
                    (property_identifier) @name
                    (private_property_identifier) @name
                    (string (string_fragment) @name)
                    (computed_property_name)
                ]) @definition)
        "#,
    ),
    PatternSpec::function(
        "object_method",
        r#"
        (object
            (method_definition
                name: [
                    (property_identifier) @name
                    (string (string_fragment) @name)
                    (computed_property_name)
                ]) @definition)
        "#,
    ),
    PatternSpec::function(
        "object_function_property",
        r#"
        (object
            (pair
                key: [
                    (property_identifier) @name
                    (string (string_fragment) @name)
                    (computed_property_name)
                ]
                value: [(function_expression) (generator_function) (arrow_function)]) @definition)
        "#,
    ),
];

static CLASS_PATTERNS: &[PatternSpec] = &[
    PatternSpec::class(
        "class_declaration",
        "(class_declaration name: (identifier) @name) @definition",
    ),
    PatternSpec::class(
        "exported_class_declaration",
        r#"
        (export_statement
            declaration: (class_declaration
                name: (identifier) @name) @definition)
        "#,
    ),
    PatternSpec::class(
        "default_exported_class_declaration",
        r#"
        (export_statement
            "default"
            declaration: (class_declaration
                name: (identifier) @name) @definition)
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

impl LanguageGrammar for JavaScriptGrammar {
    fn id(&self) -> LanguageId {
        LanguageId::JavaScript
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_javascript::LANGUAGE.into()
    }

    fn function_patterns(&self) -> &'static [PatternSpec] {
        FUNCTION_PATTERNS
    }

    fn class_patterns(&self) -> &'static [PatternSpec] {
        CLASS_PATTERNS
    }
}
