use serde::{Deserialize, Serialize};

/// Name reported for functions that have no identifier in source.
pub const ANONYMOUS_FUNCTION: &str = "[anonymous_function]";

/// Classification of an extracted construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Function,
    Class,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Function => "function",
            ElementKind::Class => "class",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node span in tree coordinates (0-based rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: u32,
}

impl Span {
    pub fn from_node(node: &tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_row: start.row as u32,
            start_column: start.column as u32,
            end_row: end.row as u32,
        }
    }

    /// 1-based inclusive start line
    pub fn start_line(&self) -> u32 {
        self.start_row + 1
    }

    /// 1-based inclusive end line
    pub fn end_line(&self) -> u32 {
        self.end_row + 1
    }
}

/// One element as produced by a single query match, before assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    pub kind: ElementKind,
    pub name: Option<String>,
    pub span: Span,
}

impl RawElement {
    pub fn new(kind: ElementKind, name: Option<String>, span: Span) -> Self {
        Self { kind, name, span }
    }

    /// Name as reported to callers; unnamed elements get the anonymous sentinel
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(ANONYMOUS_FUNCTION)
    }
}

/// A function or class found in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeElementInfo {
    pub name: String,
    /// 1-based, inclusive
    pub start_line: u32,
    /// 1-based, inclusive
    pub end_line: u32,
}

impl CodeElementInfo {
    pub fn new(name: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            name: name.into(),
            start_line,
            end_line,
        }
    }

    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_FUNCTION
    }
}

impl From<&RawElement> for CodeElementInfo {
    fn from(raw: &RawElement) -> Self {
        Self::new(raw.display_name(), raw.span.start_line(), raw.span.end_line())
    }
}

/// Function and class inventory of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub functions: Vec<CodeElementInfo>,
    pub classes: Vec<CodeElementInfo>,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.functions.len() + self.classes.len()
    }

    pub fn function(&self, name: &str) -> Option<&CodeElementInfo> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn class(&self, name: &str) -> Option<&CodeElementInfo> {
        self.classes.iter().find(|c| c.name == name)
    }
}
