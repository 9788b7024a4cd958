//! Settings of the integration whose strings are served.

/// Settings file loader
mod loader;
/// Settings manager
mod manager;
/// Integration file matcher
mod matcher;
/// Settings types and validation
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    CatalogSettings,
    ConfigError,
    ReloadConfig,
    TranslationFilesConfig,
    ValidationError,
};
