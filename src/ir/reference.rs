//! Indirection references of the form `[%key:common::config_flow::data::email%]`.

use std::fmt;

/// Opening marker of a reference.
pub const REFERENCE_OPEN: &str = "[%key:";
/// Closing marker of a reference.
pub const REFERENCE_CLOSE: &str = "%]";
/// Separator between reference path segments.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Where a reference points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceNamespace {
    /// `common::...`, shared strings supplied by the host.
    Common,
    /// `component::<domain>::...`, the strings of an integration.
    Component(String),
    /// No prefix, a path inside the referencing document.
    Local,
}

/// A parsed `[%key:...%]` target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyReference {
    /// The text between `[%key:` and `%]`.
    raw: String,
    /// Where the path is looked up.
    namespace: ReferenceNamespace,
    /// Path inside the namespace, without the namespace prefix.
    segments: Vec<String>,
}

impl KeyReference {
    /// Parses the inner path of a reference (`common::config_flow::data::email`).
    ///
    /// Returns `None` if the path is not a valid reference path.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let parts: Vec<&str> = path.split(NAMESPACE_SEPARATOR).collect();
        if parts.len() < 2 || !parts.iter().all(|part| is_valid_segment(part)) {
            return None;
        }

        let (namespace, rest) = match parts.as_slice() {
            ["common", rest @ ..] => (ReferenceNamespace::Common, rest),
            ["component", domain, rest @ ..] if !rest.is_empty() => {
                (ReferenceNamespace::Component((*domain).to_string()), rest)
            }
            ["component", ..] => return None,
            rest => (ReferenceNamespace::Local, rest),
        };

        Some(Self {
            raw: path.to_string(),
            namespace,
            segments: rest.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    /// The path as written between the markers.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Where the path is looked up.
    #[must_use]
    pub const fn namespace(&self) -> &ReferenceNamespace {
        &self.namespace
    }

    /// Dot-separated path inside the target document (`config.step.user.data.client_id`).
    #[must_use]
    pub fn document_path(&self) -> String {
        self.segments.join(".")
    }

    /// Returns true if the reference points into the document of `domain`.
    #[must_use]
    pub fn targets_domain(&self, domain: &str) -> bool {
        match &self.namespace {
            ReferenceNamespace::Local => true,
            ReferenceNamespace::Component(target) => target == domain,
            ReferenceNamespace::Common => false,
        }
    }
}

impl fmt::Display for KeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REFERENCE_OPEN}{}{REFERENCE_CLOSE}", self.raw)
    }
}

/// Lowercase ASCII, digits, `_` and `-`.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// A piece of a translation value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Text copied as it is.
    Text(&'a str),
    /// Replaced by the referenced value.
    Reference(KeyReference),
}

/// Splits a value into literal text and references.
///
/// # Errors
/// Returns the offending text when a reference is unterminated or its path is invalid.
pub fn split_references(value: &str) -> Result<Vec<Fragment<'_>>, String> {
    let mut fragments = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find(REFERENCE_OPEN) {
        let (text, tail) = rest.split_at(start);
        if !text.is_empty() {
            fragments.push(Fragment::Text(text));
        }

        let inner = tail.strip_prefix(REFERENCE_OPEN).unwrap_or(tail);
        let Some(end) = inner.find(REFERENCE_CLOSE) else {
            return Err(tail.to_string());
        };
        let (path, after) = inner.split_at(end);
        let reference = KeyReference::parse(path)
            .ok_or_else(|| format!("{REFERENCE_OPEN}{path}{REFERENCE_CLOSE}"))?;
        fragments.push(Fragment::Reference(reference));

        rest = after.strip_prefix(REFERENCE_CLOSE).unwrap_or(after);
    }

    if !rest.is_empty() {
        fragments.push(Fragment::Text(rest));
    }

    Ok(fragments)
}

/// Returns true if the value contains at least one reference marker.
#[must_use]
pub fn contains_reference(value: &str) -> bool {
    value.contains(REFERENCE_OPEN)
}
