//! Indexer type definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::MatcherError;
use crate::error::{
    ParseError,
    TranslationError,
};

/// Raw text of every file a catalog is built from.
///
/// Compared between reloads to skip rebuilding unchanged inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogInputs {
    /// Text of the source strings.
    pub source: String,
    /// Text of the host's common strings.
    pub common: String,
    /// Translation file path -> text, sorted by path.
    pub translations: BTreeMap<PathBuf, String>,
}

/// Errors while reading and parsing the files of an integration.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// A file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        /// The file.
        path: PathBuf,
        /// Why it could not be read.
        #[source]
        source: std::io::Error,
    },

    /// A file is not a valid translation document.
    #[error("Failed to parse '{}': {source}", .path.display())]
    Parse {
        /// The file.
        path: PathBuf,
        /// What is wrong with its text.
        #[source]
        source: ParseError,
    },

    /// The file patterns are invalid.
    #[error(transparent)]
    Matcher(#[from] MatcherError),

    /// The files parse but do not form a valid catalog.
    #[error(transparent)]
    Translation(#[from] TranslationError),
}
