//! Error types for loading and resolving translations.

use thiserror::Error;

use crate::types::SourcePosition;

/// Errors raised while turning translation text into a document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The text is not JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The text is JSON, but not an object.
    #[error("The root of a translation document must be an object")]
    RootNotObject,

    /// An object repeats a key, after decoding escapes.
    #[error("Key '{key}' is defined twice (first at {first}, again at {duplicate})")]
    DuplicateKey {
        /// Full key path.
        key: String,
        /// Where the key is first written.
        first: SourcePosition,
        /// Where it is written again.
        duplicate: SourcePosition,
    },

    /// A leaf is a number, boolean, null or array.
    #[error("Value of '{key}' must be a string, found {found}")]
    NonStringLeaf {
        /// Full key path.
        key: String,
        /// JSON type of the value.
        found: &'static str,
    },

    /// A key would be ambiguous once joined into a path.
    #[error("Key segment '{segment}' under '{parent}' must not contain '.' or '::'")]
    InvalidKeySegment {
        /// Path of the enclosing object, empty at the root.
        parent: String,
        /// The offending key.
        segment: String,
    },

    /// A `[%key:` is unterminated or names an invalid path.
    #[error("Malformed reference in '{key}': {reference}")]
    MalformedReference {
        /// Key whose value holds the reference.
        key: String,
        /// The text starting at `[%key:`.
        reference: String,
    },
}

/// Errors raised while looking up, resolving or formatting translations.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A document failed to parse.
    #[error("Failed to parse translation document: {0}")]
    Parse(#[from] ParseError),

    /// No document in the fallback chain has the key.
    #[error("Translation key '{0}' not found")]
    KeyNotFound(String),

    /// A reference names a path present in no namespace.
    #[error("Reference '{reference}' in '{key}' points to a missing translation")]
    UnresolvedReference {
        /// Key whose value holds the reference.
        key: String,
        /// The reference as written, without the brackets.
        reference: String,
    },

    /// References lead back to a key already being resolved.
    #[error("Reference cycle while resolving '{key}': {}", .chain.join(" -> "))]
    ReferenceCycle {
        /// Key the resolution started at.
        key: String,
        /// Keys visited, ending with the repeated one.
        chain: Vec<String>,
    },

    /// References nest deeper than the resolver follows.
    #[error("Reference chain starting at '{key}' exceeds {limit} hops")]
    ReferenceDepthExceeded {
        /// Key the resolution started at.
        key: String,
        /// Maximum number of hops.
        limit: usize,
    },

    /// A template names a placeholder the caller gave no value for.
    #[error("No value supplied for placeholder '{{{placeholder}}}'")]
    MissingPlaceholder {
        /// Name inside the braces.
        placeholder: String,
    },

    /// [`crate::store::install`] was called twice.
    #[error("A translation store is already installed for this process")]
    AlreadyInstalled,
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn duplicate_key_message_names_both_positions() {
        let error = ParseError::DuplicateKey {
            key: "entity.sensor.burner_hours".to_string(),
            first: SourcePosition { line: 3, character: 6 },
            duplicate: SourcePosition { line: 9, character: 6 },
        };

        let message = error.to_string();
        expect_that!(message, contains_substring("entity.sensor.burner_hours"));
        expect_that!(message, contains_substring("4:7"));
        expect_that!(message, contains_substring("10:7"));
    }

    #[googletest::test]
    fn missing_placeholder_message_shows_braces() {
        let error = TranslationError::MissingPlaceholder { placeholder: "preset".to_string() };

        expect_that!(error.to_string(), contains_substring("'{preset}'"));
    }

    #[googletest::test]
    fn cycle_message_lists_chain() {
        let error = TranslationError::ReferenceCycle {
            key: "a".to_string(),
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };

        expect_that!(error.to_string(), contains_substring("a -> b -> a"));
    }
}
