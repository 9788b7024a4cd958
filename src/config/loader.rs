//! Reading the settings file.

use std::path::Path;

use super::{
    CatalogSettings,
    ConfigError,
};

/// Name of the settings file at the integration root.
pub const CONFIG_FILE_NAME: &str = ".vicare-i18n.json";

/// Loads settings from the integration root.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: there is no settings file
///
/// # Errors
/// - File read error
/// - JSON parse error
pub(super) fn load_from_root(integration_root: &Path) -> Result<Option<CatalogSettings>, ConfigError> {
    let config_path = integration_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: CatalogSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
