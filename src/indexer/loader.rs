//! Discovery and reading of the files of an integration.

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use crate::bundled;
use crate::catalog::{
    CatalogSources,
    TranslationCatalog,
};
use crate::config::{
    CatalogSettings,
    ConfigManager,
    FileMatcher,
};
use crate::indexer::types::{
    CatalogInputs,
    IndexerError,
};
use crate::input::shared::SharedStrings;
use crate::input::translation::{
    TranslationDocument,
    detect_language_from_path,
};

/// Builds catalogs from the files under an integration root.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    /// Locates the files to read.
    matcher: FileMatcher,
    /// Integration the loaded catalog belongs to.
    domain: String,
    /// Language consulted after the requested one and its base.
    fallback_language: String,
}

impl CatalogLoader {
    /// # Errors
    /// Fails if a translation pattern is not a valid glob.
    pub fn new(integration_root: &Path, settings: &CatalogSettings) -> Result<Self, IndexerError> {
        Ok(Self {
            matcher: FileMatcher::new(integration_root.to_path_buf(), settings)?,
            domain: settings.domain.clone(),
            fallback_language: settings.fallback_language.clone(),
        })
    }

    /// # Errors
    /// Fails if a translation pattern is not a valid glob.
    pub fn from_config(
        integration_root: &Path,
        config_manager: &ConfigManager,
    ) -> Result<Self, IndexerError> {
        Self::new(integration_root, config_manager.get_settings())
    }

    /// Directory the files are read from.
    #[must_use]
    pub fn integration_root(&self) -> &Path {
        self.matcher.integration_root()
    }

    /// Reads all inputs concurrently.
    ///
    /// # Errors
    /// Fails if the source or common file cannot be read. Unreadable
    /// translation files are skipped with a warning.
    pub async fn read_inputs(&self) -> Result<CatalogInputs, IndexerError> {
        let translation_files = self.find_translation_files();
        tracing::debug!(
            root = %self.integration_root().display(),
            translations = translation_files.len(),
            "Reading integration files"
        );

        let common = async {
            match self.matcher.common_file() {
                Some(path) => read_file(path).await,
                None => Ok(bundled::COMMON_STRINGS.to_string()),
            }
        };
        let translations = futures::future::join_all(
            translation_files.iter().map(|path| async move { (path, read_file(path).await) }),
        );

        let (source, common, translations) =
            tokio::join!(read_file(self.matcher.source_file()), common, translations);

        let translations = translations
            .into_iter()
            .filter_map(|(path, result)| match result {
                Ok(text) => Some((path.clone(), text)),
                Err(e) => {
                    tracing::warn!("Skipping translation file: {e}");
                    None
                }
            })
            .collect();

        Ok(CatalogInputs { source: source?, common: common?, translations })
    }

    /// Parses inputs without checking references.
    ///
    /// # Errors
    /// Fails if a file is not a valid document.
    pub fn parse_inputs(&self, inputs: &CatalogInputs) -> Result<CatalogSources, IndexerError> {
        let source = TranslationDocument::parse(&inputs.source).map_err(|source| {
            IndexerError::Parse { path: self.matcher.source_file().to_path_buf(), source }
        })?;

        let shared = SharedStrings::parse(&inputs.common).map_err(|source| IndexerError::Parse {
            path: self
                .matcher
                .common_file()
                .map_or_else(|| PathBuf::from("<bundled common strings>"), Path::to_path_buf),
            source,
        })?;

        let mut sources = CatalogSources::new(self.domain.clone(), source, shared);
        sources.fallback_language.clone_from(&self.fallback_language);

        for (path, text) in &inputs.translations {
            let Some(language) = detect_language_from_path(path) else {
                tracing::warn!("Cannot detect the language of {:?}, skipping", path);
                continue;
            };
            let document = TranslationDocument::parse(text)
                .map_err(|source| IndexerError::Parse { path: path.clone(), source })?;
            sources.translations.insert(language, document);
        }

        Ok(sources)
    }

    /// Reads and parses all files.
    ///
    /// # Errors
    /// Read or parse errors.
    pub async fn load_sources(&self) -> Result<CatalogSources, IndexerError> {
        let inputs = self.read_inputs().await?;
        self.parse_inputs(&inputs)
    }

    /// Reads, parses and validates all files.
    ///
    /// # Errors
    /// Read, parse or reference errors.
    pub async fn load(&self) -> Result<TranslationCatalog, IndexerError> {
        Ok(self.load_sources().await?.build()?)
    }

    /// Translation files under the integration root, sorted.
    #[must_use]
    pub fn find_translation_files(&self) -> Vec<PathBuf> {
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(self.integration_root())
            .hidden(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            if self.matcher.is_translation_file(entry.path()) {
                found_files.push(entry.path().to_path_buf());
            }
        }

        found_files.sort();
        found_files
    }
}

/// Reads `path`, attaching it to the error.
async fn read_file(path: &Path) -> Result<String, IndexerError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IndexerError::Read { path: path.to_path_buf(), source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::Platform;
    use crate::error::TranslationError;

    const SOURCE: &str = r#"{
  "config": { "step": { "user": { "data": { "password": "[%key:common::config_flow::data::password%]" } } } },
  "entity": { "sensor": { "outside_temperature": { "name": "Outside temperature" } } }
}"#;

    fn integration(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (path, content) in files {
            let path = temp_dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        temp_dir
    }

    #[tokio::test]
    async fn loads_source_and_translations() {
        let dir = integration(&[
            ("strings.json", SOURCE),
            (
                "translations/de.json",
                r#"{"entity": {"sensor": {"outside_temperature": {"name": "Außentemperatur"}}}}"#,
            ),
            ("translations/notes.txt", "not a translation"),
        ]);
        let loader = CatalogLoader::new(dir.path(), &CatalogSettings::default()).unwrap();

        let catalog = loader.load().await.unwrap();

        assert_eq!(catalog.languages().collect::<Vec<_>>(), vec!["de"]);
        assert_eq!(
            catalog.entity_name("de", Platform::Sensor, "outside_temperature").unwrap(),
            "Außentemperatur"
        );
        assert_eq!(catalog.resolve("config.step.user.data.password").unwrap(), "Password");
    }

    #[tokio::test]
    async fn uses_configured_common_file() {
        let dir = integration(&[
            ("strings.json", SOURCE),
            ("common.json", r#"{"common": {"config_flow": {"data": {"password": "Passphrase"}}}}"#),
        ]);
        let settings =
            CatalogSettings { common_file: Some("common.json".to_string()), ..CatalogSettings::default() };
        let loader = CatalogLoader::new(dir.path(), &settings).unwrap();

        let catalog = loader.load().await.unwrap();

        assert_eq!(catalog.resolve("config.step.user.data.password").unwrap(), "Passphrase");
    }

    #[tokio::test]
    async fn missing_source_is_a_read_error() {
        let dir = integration(&[]);
        let loader = CatalogLoader::new(dir.path(), &CatalogSettings::default()).unwrap();

        let result = loader.load().await;

        assert!(matches!(result, Err(IndexerError::Read { path, .. }) if path.ends_with("strings.json")));
    }

    #[tokio::test]
    async fn invalid_translation_names_its_file() {
        let dir = integration(&[
            ("strings.json", SOURCE),
            ("translations/de.json", r#"{"entity": {"sensor": {"a": {"name": 1}}}}"#),
        ]);
        let loader = CatalogLoader::new(dir.path(), &CatalogSettings::default()).unwrap();

        let result = loader.load().await;

        assert!(matches!(result, Err(IndexerError::Parse { path, .. }) if path.ends_with("de.json")));
    }

    #[tokio::test]
    async fn unresolved_reference_fails_build() {
        let dir = integration(&[(
            "strings.json",
            r#"{"config": {"abort": {"x": "[%key:common::config_flow::abort::nope%]"}}}"#,
        )]);
        let loader = CatalogLoader::new(dir.path(), &CatalogSettings::default()).unwrap();

        let result = loader.load().await;

        assert!(matches!(
            result,
            Err(IndexerError::Translation(TranslationError::UnresolvedReference { .. }))
        ));
    }

    #[googletest::test]
    fn finds_translation_files_sorted() {
        let dir = integration(&[
            ("strings.json", SOURCE),
            ("translations/fr.json", "{}"),
            ("translations/de.json", "{}"),
            ("other/en.json", "{}"),
        ]);
        let loader = CatalogLoader::new(dir.path(), &CatalogSettings::default()).unwrap();

        let files = loader.find_translation_files();

        expect_that!(files.len(), eq(2));
        assert!(files.first().is_some_and(|path| path.ends_with("translations/de.json")));
    }

    #[tokio::test]
    async fn unknown_language_file_is_skipped() {
        let dir = integration(&[("strings.json", SOURCE), ("translations/overrides.json", "{}")]);
        let loader = CatalogLoader::new(dir.path(), &CatalogSettings::default()).unwrap();

        let sources = loader.load_sources().await.unwrap();

        assert!(sources.translations.is_empty());
    }
}
