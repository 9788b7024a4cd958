//! Errors carrying a translation key instead of a message.

use std::collections::HashMap;

use thiserror::Error;

use super::bundle::TranslationCatalog;
use super::sections;

/// An error raised by the integration with a translatable message.
///
/// The message lives in `exceptions.<key>.message` and may reference the
/// placeholders carried here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{domain}.exceptions.{key}")]
pub struct TranslatedError {
    /// Integration raising the error.
    pub domain: String,
    /// Key under `exceptions`.
    pub key: String,
    /// Values for the message placeholders.
    pub placeholders: HashMap<String, String>,
}

impl TranslatedError {
    /// An error without placeholders.
    #[must_use]
    pub fn new(domain: impl Into<String>, key: impl Into<String>) -> Self {
        Self { domain: domain.into(), key: key.into(), placeholders: HashMap::new() }
    }

    /// Adds a placeholder value.
    #[must_use]
    pub fn with_placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.insert(name.into(), value.into());
        self
    }

    /// Key path of the message template.
    #[must_use]
    pub fn message_key(&self) -> String {
        sections::exception_message(&self.key)
    }
}

impl TranslationCatalog {
    /// Renders an error's message in `language`.
    ///
    /// Falls back to the translation key when the error belongs to another
    /// domain, the message is missing or a placeholder has no value.
    #[must_use]
    pub fn render_error(&self, language: &str, error: &TranslatedError) -> String {
        if error.domain != self.domain() {
            tracing::warn!(
                domain = %error.domain,
                key = %error.key,
                "Error belongs to another domain, showing its key"
            );
            return error.key.clone();
        }

        match self.format(language, &error.message_key(), &error.placeholders) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(key = %error.key, language, "Failed to render error message: {e}");
                error.key.clone()
            }
        }
    }
}
