//! Translation document input definitions

use std::collections::hash_map::Entry;
use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::Path;

use serde_json::Value;

use crate::error::ParseError;
use crate::ir::reference::{
    NAMESPACE_SEPARATOR,
    contains_reference,
    split_references,
};
use crate::types::{
    SourcePosition,
    SourceRange,
};

/// Separator of programmatic key paths (`entity.sensor.outside_temperature.name`).
pub const KEY_SEPARATOR: &str = ".";

/// Top-level sections of an integration's strings.
pub const KNOWN_SECTIONS: &[&str] = &["config", "entity", "exceptions", "services"];

/// A parsed, immutable translation document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationDocument {
    /// Flattened translation key map (e.g., "entity.climate.heating.name" -> "Heating").
    entries: BTreeMap<String, String>,

    /// Key to source range mapping, empty for documents not built from text.
    key_ranges: HashMap<String, SourceRange>,
}

impl TranslationDocument {
    /// Parses a JSON translation document.
    ///
    /// # Errors
    /// - Malformed JSON or a non-object root
    /// - A key repeated inside one object
    /// - A leaf that is not a string
    /// - A key segment containing `.` or `::`
    /// - A malformed `[%key:...%]` reference
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let json: Value = serde_json::from_str(text)?;
        let Value::Object(root) = &json else {
            return Err(ParseError::RootNotObject);
        };

        for section in root.keys() {
            if !KNOWN_SECTIONS.contains(&section.as_str()) {
                tracing::debug!(section, "Unknown top-level translation section");
            }
        }

        let key_ranges = extract_key_ranges(text)?;

        let mut entries = BTreeMap::new();
        flatten_value(&json, None, &mut entries)?;

        tracing::debug!(entries = entries.len(), "Parsed translation document");
        Ok(Self { entries, key_ranges })
    }

    /// Builds a document from already flattened entries.
    #[must_use]
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            key_ranges: HashMap::new(),
        }
    }

    /// Raw value at `key`, references left untouched.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether `key` is a leaf string of this document.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Key path -> value.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Keys equal to `prefix` or below it, in sorted order.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.keys().map(String::as_str).filter(move |key| {
            prefix.is_empty()
                || *key == prefix
                || key
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(KEY_SEPARATOR))
        })
    }

    /// Where the key is written in the source text.
    #[must_use]
    pub fn key_range(&self, key: &str) -> Option<SourceRange> {
        self.key_ranges.get(key).copied()
    }

    /// Number of leaf strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flattens the JSON tree into dot-separated keys, validating each node.
fn flatten_value(
    json: &Value,
    prefix: Option<&str>,
    result: &mut BTreeMap<String, String>,
) -> Result<(), ParseError> {
    let full_key = || prefix.unwrap_or_default().to_string();

    match json {
        Value::Object(map) => {
            for (key, value) in map {
                if key.is_empty() || key.contains(KEY_SEPARATOR) || key.contains(NAMESPACE_SEPARATOR)
                {
                    return Err(ParseError::InvalidKeySegment {
                        parent: full_key(),
                        segment: key.clone(),
                    });
                }
                let child_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
                flatten_value(value, Some(&child_key), result)?;
            }
            Ok(())
        }
        Value::String(s) => {
            if contains_reference(s) {
                split_references(s).map_err(|reference| ParseError::MalformedReference {
                    key: full_key(),
                    reference,
                })?;
            }
            result.insert(full_key(), s.clone());
            Ok(())
        }
        Value::Array(_) => Err(ParseError::NonStringLeaf { key: full_key(), found: "an array" }),
        Value::Number(_) => Err(ParseError::NonStringLeaf { key: full_key(), found: "a number" }),
        Value::Bool(_) => Err(ParseError::NonStringLeaf { key: full_key(), found: "a boolean" }),
        Value::Null => Err(ParseError::NonStringLeaf { key: full_key(), found: "null" }),
    }
}

/// Extracts key source ranges from JSON text using tree-sitter.
///
/// `serde_json` keeps the last of several equal keys, so duplicates are
/// detected here on the syntax tree.
///
/// # Errors
/// Returns `DuplicateKey` when an object repeats a key.
pub fn extract_key_ranges(json_text: &str) -> Result<HashMap<String, SourceRange>, ParseError> {
    let mut key_ranges = HashMap::new();

    let mut parser = tree_sitter::Parser::new();
    let Ok(()) = parser.set_language(&tree_sitter_json::LANGUAGE.into()) else {
        tracing::warn!("Failed to set tree-sitter-json language");
        return Ok(key_ranges);
    };

    let Some(tree) = parser.parse(json_text, None) else {
        tracing::warn!("Failed to parse JSON with tree-sitter");
        return Ok(key_ranges);
    };

    let root_node = tree.root_node();
    let mut cursor = root_node.walk();
    let root_object = root_node.named_children(&mut cursor).find(|node| node.kind() == "object");

    if let Some(object) = root_object {
        extract_object_keys(object, json_text.as_bytes(), None, &mut key_ranges)?;
    }

    Ok(key_ranges)
}

/// Walks an object node, recording key ranges and rejecting repeated keys.
fn extract_object_keys(
    node: tree_sitter::Node<'_>,
    source: &[u8],
    prefix: Option<&str>,
    key_ranges: &mut HashMap<String, SourceRange>,
) -> Result<(), ParseError> {
    let mut seen: HashMap<String, SourcePosition> = HashMap::new();
    let mut cursor = node.walk();

    for pair in node.named_children(&mut cursor) {
        if pair.kind() != "pair" {
            continue;
        }
        let Some(key_node) = pair.child_by_field_name("key") else {
            continue;
        };
        let Some(value_node) = pair.child_by_field_name("value") else {
            continue;
        };
        let Ok(key_text) = key_node.utf8_text(source) else {
            tracing::warn!("Failed to get key text from node");
            continue;
        };
        // Escapes are decoded so `"a"` and `"\u0061"` count as the same key.
        let key = serde_json::from_str::<String>(key_text)
            .unwrap_or_else(|_| key_text.trim_matches('"').to_string());
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
        let position = SourcePosition::from(key_node.start_position());

        match seen.entry(key) {
            Entry::Occupied(first) => {
                return Err(ParseError::DuplicateKey {
                    key: full_key,
                    first: *first.get(),
                    duplicate: position,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
        }

        key_ranges.insert(full_key.clone(), SourceRange::from_node(&key_node));

        if value_node.kind() == "object" {
            extract_object_keys(value_node, source, Some(&full_key), key_ranges)?;
        }
    }

    Ok(())
}

/// Normalizes a language tag (`pt_br` -> `pt-BR`, `DE` -> `de`).
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    let mut parts = code.split(['-', '_']);
    let mut normalized = parts.next().unwrap_or_default().to_lowercase();
    for part in parts {
        normalized.push('-');
        match part.len() {
            2 => normalized.push_str(&part.to_uppercase()),
            4 => {
                let mut chars = part.chars();
                if let Some(first) = chars.next() {
                    normalized.extend(first.to_uppercase());
                    normalized.push_str(&chars.as_str().to_lowercase());
                }
            }
            _ => normalized.push_str(&part.to_lowercase()),
        }
    }
    normalized
}

/// Detects the language of a translation file from its file name.
///
/// # Examples
/// - `translations/en.json` → `en`
/// - `translations/pt-BR.json` → `pt-BR`
/// - `translations/zh-Hans.json` → `zh-Hans`
/// - `strings.json` → `None`
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<String> {
    let stem = file_path.file_stem()?.to_str()?;
    let mut parts = stem.split(['-', '_']);
    let primary = parts.next()?;
    let primary_ok = (2..=3).contains(&primary.len()) && primary.bytes().all(|b| b.is_ascii_alphabetic());
    let rest_ok = parts.all(|part| {
        (2..=8).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_alphanumeric())
    });

    (primary_ok && rest_ok).then(|| normalize_language_code(stem))
}
