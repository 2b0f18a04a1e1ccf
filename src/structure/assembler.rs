use std::collections::HashSet;

use crate::structure::models::{CodeElementInfo, ExtractionResult, RawElement};

/// Orders and deduplicates raw elements into the final inventory.
///
/// Knows nothing about grammars; all language knowledge lives in the patterns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, raw_functions: Vec<RawElement>, raw_classes: Vec<RawElement>) -> ExtractionResult {
        let classes = Self::collapse(raw_classes);

        let class_set: HashSet<&CodeElementInfo> = classes.iter().collect();
        let functions = Self::collapse(raw_functions)
            .into_iter()
            .filter(|f| !class_set.contains(f))
            .collect();

        ExtractionResult { functions, classes }
    }

    /// Sorts by position and keeps the first of each `(name, start, end)` triple
    fn collapse(mut raw: Vec<RawElement>) -> Vec<CodeElementInfo> {
        raw.sort_by(|a, b| {
            a.span
                .cmp(&b.span)
                .then_with(|| a.display_name().cmp(b.display_name()))
        });

        let mut seen = HashSet::new();
        raw.iter()
            .map(CodeElementInfo::from)
            .filter(|info| seen.insert(info.clone()))
            .collect()
    }
}
