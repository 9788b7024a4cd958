//! Message templates with `{name}` placeholders.
//!
//! `{{` and `}}` stand for literal braces. A `{` that does not open a
//! well-formed `{identifier}` is kept as text.

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::hash::BuildHasher;

use crate::error::TranslationError;

/// A piece of a message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied as it is, braces unescaped.
    Literal(String),
    /// Name inside `{...}`.
    Placeholder(String),
}

/// A parsed message template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    /// Adjacent literals are merged.
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source`. Braces that do not enclose a valid name stay literal.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(ch) = rest.chars().next() {
            if let Some(after) = rest.strip_prefix("{{") {
                literal.push('{');
                rest = after;
                continue;
            }
            if let Some(after) = rest.strip_prefix("}}") {
                literal.push('}');
                rest = after;
                continue;
            }
            if let Some(after) = rest.strip_prefix('{')
                && let Some((name, tail)) = after.split_once('}')
                && is_placeholder_name(name)
            {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name.to_string()));
                rest = tail;
                continue;
            }

            literal.push(ch);
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all placeholders, deduplicated and sorted.
    #[must_use]
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitutes every placeholder. Unused parameters are ignored.
    ///
    /// # Errors
    /// Returns `MissingPlaceholder` for the first placeholder without a value.
    pub fn render<S: BuildHasher>(
        &self,
        params: &HashMap<String, String, S>,
    ) -> Result<String, TranslationError> {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(name) => {
                    let value = params.get(name).ok_or_else(|| {
                        TranslationError::MissingPlaceholder { placeholder: name.clone() }
                    })?;
                    output.push_str(value);
                }
            }
        }
        Ok(output)
    }
}

/// ASCII letters, digits and `_`.
fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Formats a template string with named parameters.
///
/// ```
/// use std::collections::HashMap;
/// use vicare_i18n::ir::template::format;
///
/// let params = HashMap::from([("preset".to_string(), "eco".to_string())]);
/// let message =
///     format("Cannot translate preset {preset} into a valid ViCare program", &params).unwrap();
/// assert_eq!(message, "Cannot translate preset eco into a valid ViCare program");
/// ```
///
/// # Errors
/// Returns `MissingPlaceholder` if a placeholder has no value in `params`.
pub fn format<S: BuildHasher>(
    template: &str,
    params: &HashMap<String, String, S>,
) -> Result<String, TranslationError> {
    Template::parse(template).render(params)
}

/// Placeholder names used by a template string.
#[must_use]
pub fn placeholder_names(template: &str) -> BTreeSet<String> {
    Template::parse(template).placeholders().into_iter().map(str::to_string).collect()
}
