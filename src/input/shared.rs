//! The common namespace supplied by the host.
//!
//! Strings such as `common::config_flow::data::password` are shared by all
//! integrations and referenced from their documents. They are flattened
//! with `::` so a reference path is directly a lookup key.

use std::collections::BTreeMap;

use crate::error::ParseError;
use crate::input::translation::{
    KEY_SEPARATOR,
    TranslationDocument,
};
use crate::ir::reference::NAMESPACE_SEPARATOR;

/// Host-supplied shared strings, keyed by reference path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    /// Host key path -> value.
    entries: BTreeMap<String, String>,
}

impl SharedStrings {
    /// An empty namespace, every `common::` reference fails to resolve.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a shared strings document (`{"common": {"config_flow": ...}}`).
    ///
    /// # Errors
    /// Same conditions as [`TranslationDocument::parse`].
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let document = TranslationDocument::parse(text)?;
        Ok(Self::from_document(&document))
    }

    /// Takes the `common.*` entries of a host strings document.
    #[must_use]
    pub fn from_document(document: &TranslationDocument) -> Self {
        Self::from_entries(
            document
                .entries()
                .iter()
                .map(|(key, value)| (key.replace(KEY_SEPARATOR, NAMESPACE_SEPARATOR), value.clone())),
        )
    }

    /// Builds the namespace from `::`-separated keys.
    #[must_use]
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Raw value for a reference path such as `common::config_flow::data::email`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Host key path -> value.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Number of shared strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no shared strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
