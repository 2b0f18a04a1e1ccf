use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::languages::LanguageId;

/// Analyzer settings, usually read from a TOML table:
///
/// ```toml
/// enabled_languages = ["javascript", "typescript"]
/// match_limit = 10000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// `None` enables every registered language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_languages: Option<Vec<LanguageId>>,
    /// In-progress match cap for each query cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_limit: Option<u32>,
}

impl AnalyzerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn with_languages(mut self, languages: impl IntoIterator<Item = LanguageId>) -> Self {
        self.enabled_languages = Some(languages.into_iter().collect());
        self
    }

    pub fn with_match_limit(mut self, limit: u32) -> Self {
        self.match_limit = Some(limit);
        self
    }

    pub fn is_enabled(&self, language: LanguageId) -> bool {
        self.enabled_languages
            .as_ref()
            .map_or(true, |languages| languages.contains(&language))
    }
}
