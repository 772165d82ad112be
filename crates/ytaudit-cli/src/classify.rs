//! `classify` command: run the classifier on a single description.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use ytaudit_core::AppConfig;

use crate::sponsors::{build_classifier, load_rules};

/// Classify `text` (or stdin) and print the label, or `(none)`.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the classifier cannot be built.
pub(crate) async fn run_classify(
    config: &AppConfig,
    text: Option<String>,
    prefix_lines: usize,
    rules_path: Option<&Path>,
) -> anyhow::Result<()> {
    let description = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading description from stdin")?;
            buf
        }
    };

    let rules = load_rules(config, rules_path)?;
    let classifier = build_classifier(config, rules, prefix_lines)?;
    let label = classifier.classify(&description).await;

    println!("{}", display_label(label.as_str()));
    Ok(())
}

fn display_label(label: &str) -> &str {
    if label.is_empty() {
        "(none)"
    } else {
        label
    }
}
