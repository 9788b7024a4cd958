//! The translation catalog of one integration.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::hash::BuildHasher;

use super::diagnostics::{
    self,
    Diagnostic,
};
use super::resolver::Resolver;
use super::sections::{
    self,
    FlowStep,
    Platform,
};
use crate::error::TranslationError;
use crate::input::shared::SharedStrings;
use crate::input::translation::{
    KEY_SEPARATOR,
    TranslationDocument,
    normalize_language_code,
};
use crate::ir::template;

/// Language of the source document.
pub const SOURCE_LANGUAGE: &str = "en";

/// Parsed documents that have not been checked against each other yet.
#[derive(Debug, Clone)]
pub struct CatalogSources {
    /// Integration domain, `vicare` for the bundled strings.
    pub domain: String,
    /// Language tried after the requested one and its base language.
    pub fallback_language: String,
    /// The English `strings.json`.
    pub source: TranslationDocument,
    /// Language tag -> document.
    pub translations: BTreeMap<String, TranslationDocument>,
    /// Host strings behind `common::` references.
    pub shared: SharedStrings,
}

impl CatalogSources {
    /// Sources without translations, falling back to English.
    #[must_use]
    pub fn new(domain: impl Into<String>, source: TranslationDocument, shared: SharedStrings) -> Self {
        Self {
            domain: domain.into(),
            fallback_language: SOURCE_LANGUAGE.to_string(),
            source,
            translations: BTreeMap::new(),
            shared,
        }
    }

    /// Documents a lookup in `language` consults, as the built catalog would.
    #[must_use]
    pub fn fallback_chain(&self, language: &str) -> Vec<&TranslationDocument> {
        fallback_chain(language, &self.fallback_language, &self.translations, &self.source)
    }

    /// Every problem found in the sources.
    #[must_use]
    pub fn diagnose(&self) -> Vec<Diagnostic> {
        diagnostics::diagnose(self)
    }

    /// Validates all references and builds the catalog.
    ///
    /// Every language is checked along its whole fallback chain once all
    /// documents are in place, so the order of the translations does not matter.
    ///
    /// # Errors
    /// Returns the first reference that does not resolve.
    pub fn build(self) -> Result<TranslationCatalog, TranslationError> {
        let mut catalog = TranslationCatalog::from_document(self.domain, self.source, self.shared)?;
        catalog.fallback_language = normalize_language_code(&self.fallback_language);
        for (language, document) in self.translations {
            catalog.insert_translation(&language, document);
        }
        catalog.validate_languages()?;
        Ok(catalog)
    }
}

/// Documents consulted for `language`: the exact tag, its base language,
/// the fallback language and finally the source.
fn fallback_chain<'a>(
    language: &str,
    fallback_language: &str,
    translations: &'a BTreeMap<String, TranslationDocument>,
    source: &'a TranslationDocument,
) -> Vec<&'a TranslationDocument> {
    let language = normalize_language_code(language);
    let base = language.split('-').next().unwrap_or_default();
    let fallback_language = normalize_language_code(fallback_language);

    let mut tags: Vec<&str> = Vec::new();
    for tag in [language.as_str(), base, fallback_language.as_str()] {
        if tag != SOURCE_LANGUAGE && !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    tags.into_iter()
        .filter_map(|tag| translations.get(tag))
        .chain(std::iter::once(source))
        .collect()
}

/// Source strings, translations and the shared namespace of one integration.
///
/// Immutable once built. Every reference in it is known to resolve.
#[derive(Debug, Clone)]
pub struct TranslationCatalog {
    /// Integration whose `component::<domain>::` references are local.
    domain: String,
    /// English source strings, the last document of every fallback chain.
    source: TranslationDocument,
    /// Normalized language tag -> document.
    translations: BTreeMap<String, TranslationDocument>,
    /// Host strings behind `common::` references.
    shared: SharedStrings,
    /// Normalized tag tried before the source strings.
    fallback_language: String,
}

impl TranslationCatalog {
    /// Parses `strings.json` text and validates its references.
    ///
    /// # Errors
    /// - `Parse` if the text is not a valid document
    /// - `UnresolvedReference` (or a chain error) if a reference does not resolve
    pub fn load(
        domain: impl Into<String>,
        source_text: &str,
        shared: SharedStrings,
    ) -> Result<Self, TranslationError> {
        let source = TranslationDocument::parse(source_text)?;
        Self::from_document(domain, source, shared)
    }

    /// # Errors
    /// Fails if a reference of `source` does not resolve.
    pub fn from_document(
        domain: impl Into<String>,
        source: TranslationDocument,
        shared: SharedStrings,
    ) -> Result<Self, TranslationError> {
        let catalog = Self {
            domain: domain.into(),
            source,
            translations: BTreeMap::new(),
            shared,
            fallback_language: SOURCE_LANGUAGE.to_string(),
        };
        Resolver::new(&catalog.domain, [&catalog.source], &catalog.shared).validate()?;

        tracing::debug!(domain = %catalog.domain, keys = catalog.source.len(), "Loaded source strings");
        Ok(catalog)
    }

    /// Adds the document of `language`, replacing an earlier one.
    ///
    /// # Errors
    /// Fails if a reference no longer resolves for some language once the
    /// document is part of the fallback chains.
    pub fn with_translation(
        mut self,
        language: &str,
        document: TranslationDocument,
    ) -> Result<Self, TranslationError> {
        self.insert_translation(language, document);
        self.validate_languages()?;
        Ok(self)
    }

    /// Sets the language tried before the source strings.
    ///
    /// # Errors
    /// Fails if a reference no longer resolves with the new fallback chains.
    pub fn with_fallback_language(mut self, language: &str) -> Result<Self, TranslationError> {
        self.fallback_language = normalize_language_code(language);
        self.validate_languages()?;
        Ok(self)
    }

    /// Integration whose strings this is.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The source language document.
    #[must_use]
    pub const fn source(&self) -> &TranslationDocument {
        &self.source
    }

    /// Host strings behind `common::` and foreign references.
    #[must_use]
    pub const fn shared(&self) -> &SharedStrings {
        &self.shared
    }

    /// Normalized fallback language tag.
    #[must_use]
    pub fn fallback_language(&self) -> &str {
        &self.fallback_language
    }

    /// The document of exactly this language, without fallback.
    #[must_use]
    pub fn translation(&self, language: &str) -> Option<&TranslationDocument> {
        self.translations.get(&normalize_language_code(language))
    }

    /// Languages with a translation document, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }

    /// Resolves `key` in the source strings.
    ///
    /// # Errors
    /// `KeyNotFound` if the key does not exist.
    pub fn resolve(&self, key: &str) -> Result<String, TranslationError> {
        Resolver::new(&self.domain, [&self.source], &self.shared).resolve(key)
    }

    /// Resolves `key` for `language`.
    ///
    /// Tries the exact language, then its base language, then the fallback
    /// language and finally the source strings.
    ///
    /// # Errors
    /// `KeyNotFound` if no document in the chain has the key.
    pub fn resolve_in(&self, language: &str, key: &str) -> Result<String, TranslationError> {
        Resolver::new(&self.domain, self.fallback_chain(language), &self.shared).resolve(key)
    }

    /// Like [`Self::resolve_in`], but shows the key itself when it cannot be resolved.
    #[must_use]
    pub fn resolve_or_key(&self, language: &str, key: &str) -> String {
        self.resolve_in(language, key).unwrap_or_else(|e| {
            tracing::warn!(language, "Translation lookup failed: {e}");
            key.to_string()
        })
    }

    /// Resolves `key` for `language` and substitutes its placeholders.
    ///
    /// # Errors
    /// Lookup errors of [`Self::resolve_in`] or `MissingPlaceholder`.
    pub fn format<S: BuildHasher>(
        &self,
        language: &str,
        key: &str,
        params: &HashMap<String, String, S>,
    ) -> Result<String, TranslationError> {
        let message = self.resolve_in(language, key)?;
        template::format(&message, params)
    }

    /// Source keys equal to or below `prefix`, sorted.
    #[must_use]
    pub fn keys<'a>(&'a self, prefix: &'a str) -> Vec<&'a str> {
        self.source.keys_with_prefix(prefix).collect()
    }

    /// All strings for `language` as the host stores them,
    /// `component.<domain>.<key>` -> resolved text.
    ///
    /// # Errors
    /// Propagates resolution failures.
    pub fn host_strings(&self, language: &str) -> Result<BTreeMap<String, String>, TranslationError> {
        let mut keys: Vec<&str> = self.source.entries().keys().map(String::as_str).collect();
        if let Some(document) = self.translation(language) {
            keys.extend(document.entries().keys().map(String::as_str));
        }
        keys.sort_unstable();
        keys.dedup();

        keys.into_iter()
            .map(|key| {
                let value = self.resolve_in(language, key)?;
                Ok((format!("component{KEY_SEPARATOR}{}{KEY_SEPARATOR}{key}", self.domain), value))
            })
            .collect()
    }

    /// # Errors
    /// `KeyNotFound` when the entity has no name.
    pub fn entity_name(
        &self,
        language: &str,
        platform: Platform,
        key: &str,
    ) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::entity_name(platform, key))
    }

    /// # Errors
    /// `KeyNotFound` when the step has no description.
    pub fn step_description(&self, language: &str, step: FlowStep) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::step_description(step))
    }

    /// # Errors
    /// `KeyNotFound` when the field has no label.
    pub fn step_field_label(
        &self,
        language: &str,
        step: FlowStep,
        field: &str,
    ) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::step_field_label(step, field))
    }

    /// # Errors
    /// `KeyNotFound` when the field has no description.
    pub fn step_field_description(
        &self,
        language: &str,
        step: FlowStep,
        field: &str,
    ) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::step_field_description(step, field))
    }

    /// # Errors
    /// `KeyNotFound` for an unknown error code.
    pub fn flow_error(&self, language: &str, code: &str) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::flow_error(code))
    }

    /// # Errors
    /// `KeyNotFound` for an unknown abort reason.
    pub fn flow_abort(&self, language: &str, reason: &str) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::flow_abort(reason))
    }

    /// # Errors
    /// `KeyNotFound` for an unknown exception, `MissingPlaceholder` for an absent parameter.
    pub fn exception_message<S: BuildHasher>(
        &self,
        language: &str,
        key: &str,
        params: &HashMap<String, String, S>,
    ) -> Result<String, TranslationError> {
        self.format(language, &sections::exception_message(key), params)
    }

    /// # Errors
    /// `KeyNotFound` for an unknown service.
    pub fn service_name(&self, language: &str, service: &str) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::service_name(service))
    }

    /// # Errors
    /// `KeyNotFound` for an unknown service.
    pub fn service_description(
        &self,
        language: &str,
        service: &str,
    ) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::service_description(service))
    }

    /// # Errors
    /// `KeyNotFound` for an unknown service field.
    pub fn service_field_name(
        &self,
        language: &str,
        service: &str,
        field: &str,
    ) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::service_field_name(service, field))
    }

    /// # Errors
    /// `KeyNotFound` for an unknown service field.
    pub fn service_field_description(
        &self,
        language: &str,
        service: &str,
        field: &str,
    ) -> Result<String, TranslationError> {
        self.resolve_in(language, &sections::service_field_description(service, field))
    }

    /// Documents consulted for `language`, most specific first, ending with the source.
    fn fallback_chain(&self, language: &str) -> Vec<&TranslationDocument> {
        fallback_chain(language, &self.fallback_language, &self.translations, &self.source)
    }

    /// Stores a document under its normalized tag without checking it.
    fn insert_translation(&mut self, language: &str, document: TranslationDocument) {
        let language = normalize_language_code(language);
        tracing::debug!(domain = %self.domain, language, keys = document.len(), "Added translation");
        self.translations.insert(language, document);
    }

    /// Checks every reference the way [`Self::resolve_in`] follows it.
    ///
    /// A tag without its own document falls back to the chain of its base
    /// language or of the fallback language, so checking the languages that
    /// have a document covers every tag.
    fn validate_languages(&self) -> Result<(), TranslationError> {
        for language in self.translations.keys() {
            Resolver::new(&self.domain, self.fallback_chain(language), &self.shared)
                .validate_all()
                .inspect_err(|e| {
                    tracing::debug!(language = %language, "References do not resolve: {e}");
                })?;
        }
        Ok(())
    }
}
