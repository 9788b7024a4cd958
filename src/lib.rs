//! vicare-i18n
//!
//! Loader and resolver for the translation strings of the ViCare heating
//! integration: parsing, `[%key:...%]` reference resolution, `{placeholder}`
//! formatting and atomic hot reload.

pub mod bundled;
pub mod catalog;
pub mod config;
pub mod error;
pub mod indexer;
pub mod input;
pub mod ir;
pub mod reload;
pub mod store;
pub mod types;

pub use catalog::TranslationCatalog;
pub use error::{
    ParseError,
    TranslationError,
};
