//! Process-wide access to the current catalog.
//!
//! Readers take a snapshot (`Arc`) and keep using it for as long as they
//! like. A reload builds a complete new catalog first and then swaps the
//! pointer, so a reader sees either the whole old or the whole new catalog.

use std::sync::{
    Arc,
    OnceLock,
    PoisonError,
    RwLock,
};

use crate::catalog::TranslationCatalog;
use crate::error::TranslationError;

/// Store shared by the whole process, see [`install`].
static GLOBAL_STORE: OnceLock<Arc<TranslationStore>> = OnceLock::new();

/// A catalog together with the generation it was published as.
#[derive(Debug, Clone)]
struct Published {
    /// Shared with every snapshot taken of it.
    catalog: Arc<TranslationCatalog>,
    /// 0 for the initial catalog, then one more per publish.
    generation: u64,
}

/// The current catalog and the number of times it was replaced.
#[derive(Debug)]
pub struct TranslationStore {
    /// Replaced as a whole, so catalog and generation always match.
    current: RwLock<Published>,
}

impl TranslationStore {
    /// A store holding `catalog` as generation 0.
    #[must_use]
    pub fn new(catalog: TranslationCatalog) -> Self {
        Self { current: RwLock::new(Published { catalog: Arc::new(catalog), generation: 0 }) }
    }

    /// The current catalog.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TranslationCatalog> {
        Arc::clone(&self.read().catalog)
    }

    /// The current catalog with its generation, read together.
    #[must_use]
    pub fn snapshot_with_generation(&self) -> (Arc<TranslationCatalog>, u64) {
        let published = self.read();
        (Arc::clone(&published.catalog), published.generation)
    }

    /// Number of publishes so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Replaces the catalog and returns the new generation.
    pub fn publish(&self, catalog: TranslationCatalog) -> u64 {
        let catalog = Arc::new(catalog);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.catalog = catalog;
        current.generation += 1;
        let generation = current.generation;
        drop(current);

        tracing::info!(generation, "Published translation catalog");
        generation
    }

    /// Read access, ignoring poisoning since writers never leave a partial value.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Published> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Installs the process-wide store.
///
/// # Errors
/// `AlreadyInstalled` if a store was installed before.
pub fn install(store: TranslationStore) -> Result<Arc<TranslationStore>, TranslationError> {
    let store = Arc::new(store);
    GLOBAL_STORE.set(Arc::clone(&store)).map_err(|_| TranslationError::AlreadyInstalled)?;
    Ok(store)
}

/// The process-wide store, if installed.
#[must_use]
pub fn global() -> Option<Arc<TranslationStore>> {
    GLOBAL_STORE.get().cloned()
}
