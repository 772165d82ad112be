//! Layered sponsor classifier.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use ytaudit_core::{SponsorLabel, SponsorRules, DEFAULT_PREFIX_LINES};

use crate::cache::SponsorCache;
use crate::error::SponsorError;
use crate::layers::{default_layers, SponsorLayer};
use crate::model::SponsorModel;
use crate::prefix::Prefix;

/// Counters for one classifier's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassifierStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub model_calls: u64,
}

/// Maps a video description to a [`SponsorLabel`].
///
/// Only the first `prefix_lines` non-empty lines are inspected. The
/// deterministic layers run in order (deny list, known domains, known
/// brands, phrase patterns) and the first decision wins. If none decides, the
/// optional generative model is asked. Results are memoized per prefix, and
/// a label that names a deny-listed term is always replaced by "no sponsor".
pub struct SponsorClassifier {
    rules: SponsorRules,
    layers: Vec<Box<dyn SponsorLayer>>,
    model: Option<Arc<dyn SponsorModel>>,
    cache: Arc<SponsorCache>,
    prefix_lines: usize,
    model_calls: AtomicU64,
}

impl SponsorClassifier {
    /// Build a classifier with a fresh cache and the default prefix length.
    ///
    /// # Errors
    ///
    /// Returns [`SponsorError::Pattern`] if a rule term fails to compile.
    pub fn new(
        rules: SponsorRules,
        model: Option<Arc<dyn SponsorModel>>,
    ) -> Result<Self, SponsorError> {
        let layers = default_layers(&rules)?;
        Ok(Self {
            rules,
            layers,
            model,
            cache: Arc::new(SponsorCache::new()),
            prefix_lines: DEFAULT_PREFIX_LINES,
            model_calls: AtomicU64::new(0),
        })
    }

    /// Share an existing cache, e.g. across channels in one process.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<SponsorCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Set how many leading non-empty lines are classified (at least 1).
    #[must_use]
    pub fn with_prefix_lines(mut self, prefix_lines: usize) -> Self {
        self.prefix_lines = prefix_lines.max(1);
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<SponsorCache> {
        &self.cache
    }

    /// Classify one description. Never fails: model errors are logged and
    /// yield [`SponsorLabel::None`].
    pub async fn classify(&self, description: &str) -> SponsorLabel {
        let prefix = Prefix::from_description(description, self.prefix_lines);
        self.cache
            .get_or_classify(prefix.as_str(), || self.classify_uncached(&prefix))
            .await
    }

    #[must_use]
    pub fn stats(&self) -> ClassifierStats {
        ClassifierStats {
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            model_calls: self.model_calls.load(Ordering::Relaxed),
        }
    }

    async fn classify_uncached(&self, prefix: &Prefix) -> SponsorLabel {
        let (layer, label) = self.run_layers(prefix).await;
        let label = match label {
            SponsorLabel::Sponsor(name) if self.rules.is_denied(&name) => {
                tracing::debug!(layer, label = %name, "discarding deny-listed label");
                SponsorLabel::None
            }
            other => other,
        };
        tracing::debug!(layer, sponsor = %label, "classified description prefix");
        label
    }

    async fn run_layers(&self, prefix: &Prefix) -> (&'static str, SponsorLabel) {
        if prefix.is_empty() {
            return ("empty", SponsorLabel::None);
        }

        for layer in &self.layers {
            if let Some(label) = layer.detect(prefix) {
                return (layer.name(), label);
            }
        }

        let Some(model) = &self.model else {
            return ("none", SponsorLabel::None);
        };

        self.model_calls.fetch_add(1, Ordering::Relaxed);
        match model.extract_sponsor(prefix.as_str()).await {
            Ok(Some(name)) => ("model", SponsorLabel::sponsor(&name)),
            Ok(None) => ("model", SponsorLabel::None),
            Err(e) => {
                tracing::warn!(error = %e, "sponsor model failed, treating as no sponsor");
                ("model", SponsorLabel::None)
            }
        }
    }
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
