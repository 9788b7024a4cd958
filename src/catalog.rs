//! Loaded translations of an integration and the operations on them.

pub mod bundle;
pub mod diagnostics;
pub mod exception;
pub mod resolver;
pub mod sections;

pub use bundle::{
    CatalogSources,
    SOURCE_LANGUAGE,
    TranslationCatalog,
};
pub use diagnostics::{
    Diagnostic,
    Severity,
};
pub use exception::TranslatedError;
pub use resolver::Resolver;
pub use sections::{
    FlowStep,
    Platform,
};
