//! Memoizing store of classification results keyed by description prefix.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;
use ytaudit_core::SponsorLabel;

/// Prefix-keyed label cache shared by every classification in a run.
///
/// Each key owns a [`OnceCell`], so concurrent callers with the same prefix
/// wait on one computation instead of each calling the model.
#[derive(Debug, Default)]
pub struct SponsorCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<SponsorLabel>>>>,
    lookups: AtomicU64,
    misses: AtomicU64,
}

impl SponsorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached label for `key`, computing it with `classify` at
    /// most once per key.
    pub async fn get_or_classify<F, Fut>(&self, key: &str, classify: F) -> SponsorLabel
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SponsorLabel>,
    {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let cell = self.cell(key);
        let misses = &self.misses;
        cell.get_or_init(|| async move {
            misses.fetch_add(1, Ordering::Relaxed);
            classify().await
        })
        .await
        .clone()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<SponsorLabel> {
        self.lock().get(key).and_then(|cell| cell.get().cloned())
    }

    /// Seed `key` with `label`. Returns `false` if the key was already set.
    pub fn insert(&self, key: &str, label: SponsorLabel) -> bool {
        self.cell(key).set(label).is_ok()
    }

    /// Number of keys with a stored label.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.lookups
            .load(Ordering::Relaxed)
            .saturating_sub(self.misses())
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn cell(&self, key: &str) -> Arc<OnceCell<SponsorLabel>> {
        Arc::clone(self.lock().entry(key.to_string()).or_default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<OnceCell<SponsorLabel>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
