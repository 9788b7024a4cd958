//! Periodic reloading of an integration's files.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::indexer::{
    CatalogInputs,
    CatalogLoader,
    IndexerError,
};
use crate::store::TranslationStore;

/// Interval used when the settings do not name one.
pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(2);

/// Result of one reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Files are identical to the last attempt.
    Unchanged,
    /// A new catalog was published with this generation.
    Published(u64),
    /// Reading or building failed, the previous catalog stays.
    Failed,
}

/// Re-reads the files on an interval and publishes changed catalogs.
#[derive(Debug)]
pub struct ReloadWatcher {
    /// Reads and parses the integration files.
    loader: CatalogLoader,
    /// Store the catalogs are published to.
    store: Arc<TranslationStore>,
    /// Time between polls.
    interval: Duration,
    /// Inputs of the last attempt, successful or not.
    last_inputs: Option<CatalogInputs>,
    /// Whether the last attempt succeeded, so a failure is warned about once.
    last_reload_success: bool,
    /// Generation of every publish.
    updates: watch::Sender<u64>,
}

impl ReloadWatcher {
    /// A watcher polling every `interval`.
    #[must_use]
    pub fn new(loader: CatalogLoader, store: Arc<TranslationStore>, interval: Duration) -> Self {
        let (updates, _) = watch::channel(store.generation());
        Self {
            loader,
            store,
            interval,
            last_inputs: None,
            last_reload_success: true,
            updates,
        }
    }

    /// Marks `inputs` as already published, so an unchanged first poll does nothing.
    #[must_use]
    pub fn with_baseline(mut self, inputs: CatalogInputs) -> Self {
        self.last_inputs = Some(inputs);
        self
    }

    /// Receives the generation of every publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.subscribe()
    }

    /// Polls the files once.
    pub async fn reload_once(&mut self) -> ReloadOutcome {
        let inputs = match self.loader.read_inputs().await {
            Ok(inputs) => inputs,
            Err(e) => {
                self.record_failure(&e);
                return ReloadOutcome::Failed;
            }
        };

        if self.last_inputs.as_ref() == Some(&inputs) {
            tracing::trace!("Translation files unchanged");
            return ReloadOutcome::Unchanged;
        }

        let built = self
            .loader
            .parse_inputs(&inputs)
            .and_then(|sources| sources.build().map_err(IndexerError::from));
        self.last_inputs = Some(inputs);

        match built {
            Ok(catalog) => {
                let generation = self.store.publish(catalog);
                if !self.last_reload_success {
                    tracing::info!("Reloading translations recovered");
                    self.last_reload_success = true;
                }
                self.updates.send_replace(generation);
                ReloadOutcome::Published(generation)
            }
            Err(e) => {
                self.record_failure(&e);
                ReloadOutcome::Failed
            }
        }
    }

    /// Polls until `shutdown` turns true or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::info!(
            root = %self.loader.integration_root().display(),
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            "Translation reload watcher started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.reload_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Translation reload watcher stopped");
    }

    /// Warns on the first failure after a success, then only logs at debug.
    fn record_failure(&mut self, error: &IndexerError) {
        if self.last_reload_success {
            tracing::warn!("Reloading translations failed, keeping the previous catalog: {error}");
            self.last_reload_success = false;
        } else {
            tracing::debug!("Reloading translations still failing: {error}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CatalogSettings;

    fn source(name: &str) -> String {
        format!(r#"{{"entity": {{"sensor": {{"outside_temperature": {{"name": "{name}"}}}}}}}}"#)
    }

    async fn setup(name: &str) -> (TempDir, ReloadWatcher, Arc<TranslationStore>) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("strings.json"), source(name)).unwrap();
        let loader = CatalogLoader::new(dir.path(), &CatalogSettings::default()).unwrap();
        let inputs = loader.read_inputs().await.unwrap();
        let catalog = loader.parse_inputs(&inputs).unwrap().build().unwrap();
        let store = Arc::new(TranslationStore::new(catalog));
        let watcher = ReloadWatcher::new(loader, Arc::clone(&store), Duration::from_millis(10))
            .with_baseline(inputs);
        (dir, watcher, store)
    }

    fn name(store: &TranslationStore) -> String {
        store.snapshot().resolve("entity.sensor.outside_temperature.name").unwrap()
    }

    #[tokio::test]
    async fn unchanged_files_are_skipped() {
        let (_dir, mut watcher, store) = setup("Outside temperature").await;

        assert_eq!(watcher.reload_once().await, ReloadOutcome::Unchanged);
        assert_that!(store.generation(), eq(0));
    }

    #[tokio::test]
    async fn changed_files_are_published() {
        let (dir, mut watcher, store) = setup("Outside temperature").await;
        let updates = watcher.subscribe();
        fs::write(dir.path().join("strings.json"), source("Outdoor temperature")).unwrap();

        assert_eq!(watcher.reload_once().await, ReloadOutcome::Published(1));
        assert_that!(name(&store), eq("Outdoor temperature"));
        assert_that!(*updates.borrow(), eq(1));
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_catalog() {
        let (dir, mut watcher, store) = setup("Outside temperature").await;
        fs::write(dir.path().join("strings.json"), "{ broken").unwrap();

        assert_eq!(watcher.reload_once().await, ReloadOutcome::Failed);
        assert_eq!(watcher.reload_once().await, ReloadOutcome::Unchanged);
        assert_that!(name(&store), eq("Outside temperature"));

        fs::write(dir.path().join("strings.json"), source("Recovered")).unwrap();
        assert_eq!(watcher.reload_once().await, ReloadOutcome::Published(1));
        assert_that!(name(&store), eq("Recovered"));
    }

    #[tokio::test]
    async fn missing_file_is_a_failure() {
        let (dir, mut watcher, store) = setup("Outside temperature").await;
        fs::remove_file(dir.path().join("strings.json")).unwrap();

        assert_eq!(watcher.reload_once().await, ReloadOutcome::Failed);
        assert_that!(store.generation(), eq(0));
    }

    #[tokio::test]
    async fn run_publishes_until_shutdown() {
        let (dir, watcher, store) = setup("Outside temperature").await;
        let mut updates = watcher.subscribe();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(watcher.run(shutdown_rx));

        fs::write(dir.path().join("strings.json"), source("Outdoor temperature")).unwrap();
        tokio::time::timeout(Duration::from_secs(5), updates.changed()).await.unwrap().unwrap();

        assert_that!(name(&store), eq("Outdoor temperature"));
        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    }
}
