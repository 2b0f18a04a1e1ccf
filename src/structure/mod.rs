pub mod assembler;
pub mod extractor;
pub mod models;
pub mod parser;

pub use assembler::ResultAssembler;
pub use extractor::{Match, MatchExtractor};
pub use models::{CodeElementInfo, ElementKind, ExtractionResult, RawElement, Span, ANONYMOUS_FUNCTION};
pub use parser::{Parser, SyntaxTree};
