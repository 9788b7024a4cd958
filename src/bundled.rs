//! Strings shipped inside the binary.
//!
//! The ViCare source strings, its German translation and the part of the
//! host's common namespace the integration references.

use crate::catalog::{
    CatalogSources,
    TranslationCatalog,
};
use crate::error::{
    ParseError,
    TranslationError,
};
use crate::input::shared::SharedStrings;
use crate::input::translation::TranslationDocument;

/// Domain of the bundled integration.
pub const DOMAIN: &str = "vicare";

/// Source strings of the integration, `strings.json`.
pub const SOURCE_STRINGS: &str = include_str!("../resources/vicare/strings.json");

/// The host's common namespace, `{"common": {...}}`.
pub const COMMON_STRINGS: &str = include_str!("../resources/common/strings.json");

/// Language tag -> translation text.
pub const TRANSLATIONS: &[(&str, &str)] =
    &[("de", include_str!("../resources/vicare/translations/de.json"))];

/// The bundled common namespace.
///
/// # Errors
/// Fails only if the embedded text is not a valid document.
pub fn common_strings() -> Result<SharedStrings, ParseError> {
    SharedStrings::parse(COMMON_STRINGS)
}

/// Parsed bundled documents.
///
/// # Errors
/// Fails only if an embedded text is not a valid document.
pub fn sources() -> Result<CatalogSources, ParseError> {
    let mut sources =
        CatalogSources::new(DOMAIN, TranslationDocument::parse(SOURCE_STRINGS)?, common_strings()?);
    for (language, text) in TRANSLATIONS {
        sources.translations.insert((*language).to_string(), TranslationDocument::parse(text)?);
    }
    Ok(sources)
}

/// The bundled catalog.
///
/// # Errors
/// Fails only if the embedded texts are inconsistent.
pub fn catalog() -> Result<TranslationCatalog, TranslationError> {
    sources()?.build()
}
