//! Whole-catalog checks reporting every problem instead of the first.

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::fmt;

use super::bundle::{
    CatalogSources,
    SOURCE_LANGUAGE,
};
use super::resolver::Resolver;
use super::sections::{
    Platform,
    split_entity_key,
};
use crate::input::translation::TranslationDocument;
use crate::ir::template::placeholder_names;
use crate::types::SourceRange;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The catalog will not build.
    Error,
    /// Builds, but something is probably wrong.
    Warning,
    /// Worth knowing.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// A problem found in a source or translation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// Language of the document the problem is in.
    pub language: String,
    /// Key path the problem is attached to.
    pub key: String,
    /// Human-readable description.
    pub message: String,
    /// Where the key is written, if the document was parsed from text.
    pub range: Option<SourceRange>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.language, self.key)?;
        if let Some(range) = self.range {
            write!(f, " ({})", range.start)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Collects diagnostics in one document.
struct Collector<'a> {
    /// Language of `document`.
    language: &'a str,
    /// Document being checked.
    document: &'a TranslationDocument,
    /// Output, shared by all documents.
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl Collector<'_> {
    /// Adds a diagnostic at the range of `key`.
    fn push(&mut self, severity: Severity, key: &str, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            language: self.language.to_string(),
            key: key.to_string(),
            message,
            range: self.document.key_range(key),
        });
    }
}

/// Checks the source strings and every translation.
#[must_use]
pub fn diagnose(sources: &CatalogSources) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let mut collector = Collector {
        language: SOURCE_LANGUAGE,
        document: &sources.source,
        diagnostics: &mut diagnostics,
    };
    check_references(&mut collector, &Resolver::new(&sources.domain, [&sources.source], &sources.shared));
    check_entities(&mut collector);
    check_shared_names(&mut collector);

    for (language, document) in &sources.translations {
        tracing::debug!(language, "Checking translation");
        let mut collector = Collector { language, document, diagnostics: &mut diagnostics };
        check_references(
            &mut collector,
            &Resolver::new(&sources.domain, sources.fallback_chain(language), &sources.shared),
        );
        check_entities(&mut collector);
        check_against_source(&mut collector, &sources.source);
    }

    diagnostics.sort_by(|a, b| {
        (a.severity, &a.language, &a.key).cmp(&(b.severity, &b.language, &b.key))
    });
    diagnostics
}

/// Every reference resolves without a cycle.
fn check_references(collector: &mut Collector<'_>, resolver: &Resolver<'_>) {
    for (key, error) in resolver.failures() {
        collector.push(Severity::Error, &key, error.to_string());
    }
}

/// Entity names are present and aliases point at entities of the same platform.
fn check_entities(collector: &mut Collector<'_>) {
    let document = collector.document;
    let mut named: BTreeMap<(&str, &str), bool> = BTreeMap::new();
    for key in document.keys_with_prefix("entity") {
        let Some((platform, entity)) = split_entity_key(key) else {
            continue;
        };
        let has_name = key == format!("entity.{platform}.{entity}.name");
        *named.entry((platform, entity)).or_default() |= has_name;
    }

    let mut unknown_platforms = BTreeSet::new();
    for ((platform, entity), has_name) in named {
        if platform.parse::<Platform>().is_err() {
            if unknown_platforms.insert(platform) {
                collector.push(
                    Severity::Warning,
                    &format!("entity.{platform}"),
                    format!("Unknown entity platform '{platform}'"),
                );
            }
            continue;
        }
        if !has_name {
            collector.push(
                Severity::Warning,
                &format!("entity.{platform}.{entity}"),
                "Entity has no 'name'".to_string(),
            );
        }
    }
}

/// Reports display names used by more than one entity of a platform.
fn check_shared_names(collector: &mut Collector<'_>) {
    let document = collector.document;
    let mut by_name: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
    for (key, value) in document.entries() {
        if let Some((platform, _)) = split_entity_key(key)
            && key.ends_with(".name")
        {
            by_name.entry((platform, value.as_str())).or_default().push(key.as_str());
        }
    }

    for ((_, name), keys) in by_name {
        if let [first, rest @ ..] = keys.as_slice()
            && !rest.is_empty()
        {
            collector.push(
                Severity::Info,
                first,
                format!("Display name '{name}' is also used by {}", rest.join(", ")),
            );
        }
    }
}

/// Keys and placeholders of a translation match the source.
fn check_against_source(collector: &mut Collector<'_>, source: &TranslationDocument) {
    let document = collector.document;

    for (key, value) in document.entries() {
        let Some(source_value) = source.get(key) else {
            collector.push(Severity::Warning, key, "Key does not exist in the source strings".to_string());
            continue;
        };

        let expected = placeholder_names(source_value);
        let found = placeholder_names(value);
        if expected != found {
            collector.push(
                Severity::Warning,
                key,
                format!(
                    "Placeholders {{{}}} differ from the source {{{}}}",
                    join(&found),
                    join(&expected)
                ),
            );
        }
    }

    for key in source.entries().keys() {
        if !document.contains_key(key) {
            collector.push(Severity::Info, key, "Not translated".to_string());
        }
    }
}

/// Comma-separated names, for messages.
fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
