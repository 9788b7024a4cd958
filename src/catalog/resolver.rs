//! Reference resolution.
//!
//! A reference to the integration's own strings (`component::<domain>::...`
//! or an unprefixed path) is looked up in the documents of the resolver in
//! order, and in the shared namespace when no document has it. Everything
//! else is looked up in the shared namespace by its full `::` path. Values reached through a reference are expanded again, so
//! chains such as `config.abort.unknown` -> `common::config_flow::abort::unknown`
//! -> `common::config_flow::error::unknown` resolve to a literal.

use std::collections::BTreeSet;

use crate::error::TranslationError;
use crate::input::shared::SharedStrings;
use crate::input::translation::TranslationDocument;
use crate::ir::reference::{
    Fragment,
    KeyReference,
    contains_reference,
    split_references,
};

/// Maximum number of references followed from one key.
pub const MAX_REFERENCE_DEPTH: usize = 8;

/// Resolves keys of a document against its fallbacks and the shared namespace.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    /// Integration whose `component::<domain>::` references are local.
    domain: &'a str,
    /// Lookup order for keys and own-domain references, most specific first.
    documents: Vec<&'a TranslationDocument>,
    /// Host strings for `common::` and foreign references.
    shared: &'a SharedStrings,
}

impl<'a> Resolver<'a> {
    /// Resolves against `documents`, the first one having the highest priority.
    #[must_use]
    pub fn new(
        domain: &'a str,
        documents: impl IntoIterator<Item = &'a TranslationDocument>,
        shared: &'a SharedStrings,
    ) -> Self {
        Self { domain, documents: documents.into_iter().collect(), shared }
    }

    /// Resolves `key` to a literal string, reading it from the first document that has it.
    ///
    /// # Errors
    /// - `KeyNotFound` if no document has the key
    /// - `UnresolvedReference` if a reference target does not exist
    /// - `ReferenceCycle` or `ReferenceDepthExceeded` for runaway chains
    pub fn resolve(&self, key: &str) -> Result<String, TranslationError> {
        let value = self
            .documents
            .iter()
            .find_map(|document| document.get(key))
            .ok_or_else(|| TranslationError::KeyNotFound(key.to_string()))?;

        let mut chain = vec![key.to_string()];
        self.expand(key, value, &mut chain)
    }

    /// Resolves every key of the primary document that contains a reference.
    ///
    /// # Errors
    /// Returns the first failure in key order.
    pub fn validate(&self) -> Result<(), TranslationError> {
        match self.failures().into_iter().next() {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }

    /// Resolves every key for which some document holds a reference.
    ///
    /// Unlike [`Self::validate`] this also covers keys the primary document
    /// does not define, so cycles that run through several documents are found.
    ///
    /// # Errors
    /// Returns the first failure in key order.
    pub fn validate_all(&self) -> Result<(), TranslationError> {
        let mut keys = BTreeSet::new();
        for document in &self.documents {
            for (key, value) in document.entries() {
                if contains_reference(value) {
                    keys.insert(key.as_str());
                }
            }
        }

        for key in keys {
            self.resolve(key)?;
        }
        Ok(())
    }

    /// Every key with a reference that fails to resolve, in key order.
    #[must_use]
    pub fn failures(&self) -> Vec<(String, TranslationError)> {
        let Some(primary) = self.documents.first() else {
            return Vec::new();
        };

        primary
            .entries()
            .iter()
            .filter(|(_, value)| contains_reference(value))
            .filter_map(|(key, _)| self.resolve(key).err().map(|error| (key.clone(), error)))
            .collect()
    }

    /// Replaces the references in `value`. `chain` holds the keys being resolved.
    fn expand(
        &self,
        key: &str,
        value: &str,
        chain: &mut Vec<String>,
    ) -> Result<String, TranslationError> {
        if !contains_reference(value) {
            return Ok(value.to_string());
        }

        let fragments = split_references(value).map_err(|reference| {
            TranslationError::UnresolvedReference { key: key.to_string(), reference }
        })?;

        let mut output = String::with_capacity(value.len());
        for fragment in fragments {
            let reference = match fragment {
                Fragment::Text(text) => {
                    output.push_str(text);
                    continue;
                }
                Fragment::Reference(reference) => reference,
            };

            let (target_key, target_value) =
                self.lookup(&reference).ok_or_else(|| TranslationError::UnresolvedReference {
                    key: key.to_string(),
                    reference: reference.to_string(),
                })?;

            let root = chain.first().cloned().unwrap_or_default();
            if chain.contains(&target_key) {
                let mut cycle = chain.clone();
                cycle.push(target_key);
                return Err(TranslationError::ReferenceCycle { key: root, chain: cycle });
            }
            if chain.len() > MAX_REFERENCE_DEPTH {
                return Err(TranslationError::ReferenceDepthExceeded {
                    key: root,
                    limit: MAX_REFERENCE_DEPTH,
                });
            }

            chain.push(target_key.clone());
            let resolved = self.expand(&target_key, target_value, chain)?;
            chain.pop();
            output.push_str(&resolved);
        }

        Ok(output)
    }

    /// Finds the raw value a reference points to, with the key naming it in a chain.
    ///
    /// Own-domain references not found in the documents are tried in the
    /// shared namespace as well.
    fn lookup(&self, reference: &KeyReference) -> Option<(String, &'a str)> {
        if reference.targets_domain(self.domain) {
            let path = reference.document_path();
            if let Some(value) = self.documents.iter().find_map(|document| document.get(&path)) {
                return Some((path, value));
            }
        }

        let value = self.shared.get(reference.raw())?;
        Some((reference.raw().to_string(), value))
    }
}
