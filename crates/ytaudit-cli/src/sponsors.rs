//! Rule loading and classifier construction shared by `audit` and `classify`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use ytaudit_core::{AppConfig, SponsorRules};
use ytaudit_sponsor::{OpenAiSponsorModel, SponsorClassifier, SponsorModel};

/// Load sponsor rules.
///
/// An explicit `--rules` path must exist. The configured default path falls
/// back to the built-in lists when the file is absent.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or fails validation.
pub(crate) fn load_rules(
    config: &AppConfig,
    override_path: Option<&Path>,
) -> anyhow::Result<SponsorRules> {
    if let Some(path) = override_path {
        return ytaudit_core::load_sponsor_rules(path)
            .with_context(|| format!("loading sponsor rules from {}", path.display()));
    }

    let path = config.sponsor_rules_path.as_path();
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "sponsor rules file not found, using built-in lists"
        );
        return Ok(SponsorRules::default());
    }

    let rules = ytaudit_core::load_sponsor_rules(path)
        .with_context(|| format!("loading sponsor rules from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        deny = rules.deny_list.len(),
        domains = rules.known_domains.len(),
        brands = rules.known_brands.len(),
        "loaded sponsor rules"
    );
    Ok(rules)
}

/// Build a classifier, attaching the generative model when an `OpenAI` key
/// is configured.
///
/// # Errors
///
/// Returns an error if a rule pattern or the model HTTP client cannot be built.
pub(crate) fn build_classifier(
    config: &AppConfig,
    rules: SponsorRules,
    prefix_lines: usize,
) -> anyhow::Result<SponsorClassifier> {
    let model: Option<Arc<dyn SponsorModel>> = match config.openai_api_key.as_deref() {
        Some(key) => {
            let model = OpenAiSponsorModel::new(
                key,
                &config.openai_model,
                &config.openai_base_url,
                config.model_timeout_secs,
            )?;
            tracing::debug!(model = %config.openai_model, "generative-model layer enabled");
            Some(Arc::new(model) as Arc<dyn SponsorModel>)
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, generative-model layer disabled");
            None
        }
    };

    Ok(SponsorClassifier::new(rules, model)?.with_prefix_lines(prefix_lines))
}
