use thiserror::Error;

/// Failure of a structural analysis call.
///
/// Malformed source is not an error: it degrades to partial extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to load grammar for {language}: {reason}")]
    GrammarLoadFailed { language: String, reason: String },

    #[error("Failed to parse {language} source: {reason}")]
    ParseFailed { language: String, reason: String },
}

impl StructureError {
    pub(crate) fn grammar_load(language: impl Into<String>, reason: impl ToString) -> Self {
        Self::GrammarLoadFailed {
            language: language.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(language: impl Into<String>, reason: impl ToString) -> Self {
        Self::ParseFailed {
            language: language.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised while loading an [`AnalyzerConfig`](crate::config::AnalyzerConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StructureError>;
