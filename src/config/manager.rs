//! Settings of the integration being served.

use std::path::Path;

use super::{
    CatalogSettings,
    ConfigError,
    loader,
};

/// Holds the validated settings of one integration.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Settings in effect, the defaults until a load succeeds.
    current_settings: CatalogSettings,
}

impl ConfigManager {
    /// A manager with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: CatalogSettings::default() }
    }

    /// Loads and validates the settings of `integration_root`.
    ///
    /// Without a root, or without a settings file, the defaults apply.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    /// - Validation error
    pub fn load_settings(&mut self, integration_root: Option<&Path>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for integration: {:?}", integration_root);

        let settings = if let Some(root) = integration_root {
            loader::load_from_root(root)?.map_or_else(CatalogSettings::default, |loaded| {
                tracing::debug!("Loaded integration settings: {:?}", loaded);
                loaded
            })
        } else {
            CatalogSettings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// Settings in effect.
    #[must_use]
    pub const fn get_settings(&self) -> &CatalogSettings {
        &self.current_settings
    }
}
