use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A single invalid settings field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFiles.includePatterns[0]")
    pub field_path: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    /// An error for the field at `field_path`.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Errors while loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more fields have invalid values.
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The settings file exists but could not be read.
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The settings file is not valid JSON for the settings.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One numbered line per error.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `.vicare-i18n.json` at the integration root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Integration domain, the `<name>` of `component::<name>::...` references.
    pub domain: String,

    /// Source strings, relative to the integration root.
    pub source_file: String,

    /// JSON file with the host's common namespace (`{"common": {...}}`).
    /// If unset, the bundled copy is used.
    pub common_file: Option<String>,

    /// Where the translations are.
    pub translation_files: TranslationFilesConfig,

    /// Language consulted after the requested one and its base language.
    pub fallback_language: String,

    /// Used by `watch`.
    pub reload: ReloadConfig,
}

/// Glob patterns selecting `translations/<lang>.json` files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    /// Relative to the integration root.
    pub include_patterns: Vec<String>,
    /// Matches here win over the include patterns.
    pub exclude_patterns: Vec<String>,
}

/// Hot-reload settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReloadConfig {
    /// Polling interval in milliseconds.
    pub interval_ms: Option<u64>,
}

impl ReloadConfig {
    /// The configured interval, if any.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval_ms.map(Duration::from_millis)
    }
}

impl CatalogSettings {
    /// # Errors
    /// - Invalid domain
    /// - Empty source file or fallback language
    /// - Invalid glob pattern
    /// - Zero reload interval
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.domain.is_empty() {
            errors.push(ValidationError::new(
                "domain",
                "The domain cannot be empty. Example: \"vicare\"",
            ));
        } else if !self.domain.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        {
            errors.push(ValidationError::new(
                "domain",
                format!(
                    "Invalid domain '{}': only lowercase letters, digits and '_' are allowed",
                    self.domain
                ),
            ));
        }

        if self.source_file.is_empty() {
            errors.push(ValidationError::new(
                "sourceFile",
                "The path cannot be empty. Example: \"strings.json\"",
            ));
        }

        if let Some(common_file) = &self.common_file
            && common_file.is_empty()
        {
            errors.push(ValidationError::new(
                "commonFile",
                "The path cannot be empty. Please specify a file, or remove this field",
            ));
        }

        if self.translation_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"translations/*.json\"]",
            ));
        }

        for (index, pattern) in self.translation_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.translation_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.fallback_language.is_empty() {
            errors.push(ValidationError::new(
                "fallbackLanguage",
                "The language cannot be empty. Example: \"en\"",
            ));
        }

        if self.reload.interval_ms == Some(0) {
            errors.push(ValidationError::new(
                "reload.intervalMs",
                "The interval must be greater than 0, or remove this field",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { include_patterns: vec!["translations/*.json".to_string()], exclude_patterns: vec![] }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            domain: "vicare".to_string(),
            source_file: "strings.json".to_string(),
            common_file: None,
            translation_files: TranslationFilesConfig::default(),
            fallback_language: "en".to_string(),
            reload: ReloadConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = CatalogSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"fallbackLanguage": "de", "reload": {"intervalMs": 500}}"#;

        let settings: CatalogSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.domain, eq("vicare"));
        assert_that!(settings.fallback_language, eq("de"));
        assert_that!(settings.reload.interval(), some(eq(Duration::from_millis(500))));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: CatalogSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings.source_file, eq("strings.json"));
        assert_that!(
            settings.translation_files.include_patterns,
            elements_are![eq("translations/*.json")]
        );
        assert_that!(settings.translation_files.exclude_patterns, is_empty());
        assert_that!(settings.common_file, none());
        assert_that!(settings.reload.interval(), none());
    }

    #[rstest]
    #[case::empty("", "cannot be empty")]
    #[case::uppercase("ViCare", "Invalid domain 'ViCare'")]
    #[case::dots("vi.care", "only lowercase letters")]
    fn validate_invalid_domain(#[case] domain: &str, #[case] message: &str) {
        let settings = CatalogSettings { domain: domain.to_string(), ..CatalogSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("domain")),
                field!(ValidationError.message, contains_substring(message))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_common_file_empty() {
        let settings =
            CatalogSettings { common_file: Some(String::new()), ..CatalogSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("commonFile")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_include_patterns_empty() {
        let settings = CatalogSettings {
            translation_files: TranslationFilesConfig {
                include_patterns: vec![],
                exclude_patterns: vec![],
            },
            ..CatalogSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.includePatterns")),
                field!(ValidationError.message, contains_substring("At least one pattern"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_exclude_pattern_invalid_glob() {
        let settings = CatalogSettings {
            translation_files: TranslationFilesConfig {
                include_patterns: vec!["translations/*.json".to_string()],
                exclude_patterns: vec!["translations/en.json".to_string(), "invalid[pattern".to_string()],
            },
            ..CatalogSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.excludePatterns[1]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("invalid[pattern"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_reload_interval_zero() {
        let settings = CatalogSettings {
            reload: ReloadConfig { interval_ms: Some(0) },
            ..CatalogSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("reload.intervalMs")),
                field!(ValidationError.message, contains_substring("greater than 0"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = CatalogSettings {
            source_file: String::new(),
            fallback_language: String::new(),
            ..CatalogSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. sourceFile"));
        assert_that!(error_message, contains_substring("2. fallbackLanguage"));
    }
}
