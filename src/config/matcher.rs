//! Path matcher for the files of an integration.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::CatalogSettings;

/// Errors while compiling the file patterns.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// An include pattern is not a valid glob.
    #[error("Invalid translation file pattern '{pattern}': {source}")]
    InvalidTranslationPattern {
        /// The pattern as configured.
        pattern: String,
        /// Why it does not compile.
        #[source]
        source: globset::Error,
    },

    /// An exclude pattern is not a valid glob.
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        /// The pattern as configured.
        pattern: String,
        /// Why it does not compile.
        #[source]
        source: globset::Error,
    },

    /// The patterns could not be combined.
    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Locates the source strings, the common namespace and translation files
/// under an integration root.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    /// Directory all settings paths are relative to.
    integration_root: PathBuf,
    /// Absolute path of `strings.json`.
    source_file: PathBuf,
    /// Absolute path of the host strings, if configured.
    common_file: Option<PathBuf>,
    /// Include patterns, relative to the root.
    translation_set: GlobSet,
    /// Files matching these are skipped even if included.
    translation_exclude_set: GlobSet,
}

impl FileMatcher {
    /// Creates a new matcher from settings.
    ///
    /// # Errors
    /// Fails if a translation pattern is not a valid glob.
    pub fn new(integration_root: PathBuf, settings: &CatalogSettings) -> Result<Self, MatcherError> {
        let translation_set = Self::build_glob_set(
            &settings.translation_files.include_patterns,
            |pattern, source| MatcherError::InvalidTranslationPattern { pattern, source },
        )?;

        let translation_exclude_set = Self::build_glob_set(
            &settings.translation_files.exclude_patterns,
            |pattern, source| MatcherError::InvalidExcludePattern { pattern, source },
        )?;

        Ok(Self {
            source_file: integration_root.join(&settings.source_file),
            common_file: settings.common_file.as_ref().map(|file| integration_root.join(file)),
            integration_root,
            translation_set,
            translation_exclude_set,
        })
    }

    /// Compiles `patterns`, reporting the first invalid one through `make_error`.
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Directory the patterns are relative to.
    #[must_use]
    pub fn integration_root(&self) -> &Path {
        &self.integration_root
    }

    /// Absolute path of the source strings.
    #[must_use]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Absolute path of the common namespace file, if configured.
    #[must_use]
    pub fn common_file(&self) -> Option<&Path> {
        self.common_file.as_deref()
    }

    /// Returns true if the path matches `translationFiles.includePatterns`
    /// but not `translationFiles.excludePatterns`.
    ///
    /// The path must be absolute and under the integration root.
    #[must_use]
    pub fn is_translation_file(&self, absolute_path: &Path) -> bool {
        let Some(relative_path) = absolute_path.strip_prefix(&self.integration_root).ok() else {
            return false;
        };

        self.is_translation_file_relative(relative_path)
    }

    /// Same as [`Self::is_translation_file`] for a path relative to the integration root.
    #[must_use]
    pub fn is_translation_file_relative(&self, relative_path: &Path) -> bool {
        self.translation_set.is_match(relative_path)
            && !self.translation_exclude_set.is_match(relative_path)
    }
}
