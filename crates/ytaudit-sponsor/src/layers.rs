//! Deterministic sponsor-detection layers.
//!
//! Each layer inspects a description [`Prefix`] and either decides the label
//! or passes. The classifier runs them in a fixed order and stops at the
//! first decision.

use std::sync::LazyLock;

use regex::Regex;
use ytaudit_core::{SponsorLabel, SponsorRules};

use crate::error::SponsorError;
use crate::prefix::Prefix;

/// One strategy in the classifier's fallback chain.
pub trait SponsorLayer: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Some` decides the label (including `SponsorLabel::None`); `None` passes
    /// to the next layer.
    fn detect(&self, prefix: &Prefix) -> Option<SponsorLabel>;
}

/// Uppercase the first character and lowercase the rest.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Case-insensitive, whole-word regex for a single literal term.
fn word_pattern(term: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))
}

/// Any deny-listed term in the prefix forces "no sponsor".
///
/// Terms match at a leading word boundary and may carry a plural `s`/`es`
/// ending, so `course` also catches `courses` but not `recourse`.
pub struct DenyListLayer {
    pattern: Option<Regex>,
}

impl DenyListLayer {
    /// # Errors
    ///
    /// Returns [`SponsorError::Pattern`] if the combined pattern is too large.
    pub fn new(terms: &[String]) -> Result<Self, SponsorError> {
        let alternatives: Vec<String> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();
        let pattern = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?i)\b(?:{})(?:s|es)?\b",
                alternatives.join("|")
            ))?)
        };
        Ok(Self { pattern })
    }
}

impl SponsorLayer for DenyListLayer {
    fn name(&self) -> &'static str {
        "deny_list"
    }

    fn detect(&self, prefix: &Prefix) -> Option<SponsorLabel> {
        let pattern = self.pattern.as_ref()?;
        pattern
            .is_match(prefix.as_str())
            .then_some(SponsorLabel::None)
    }
}

/// Known sponsor domains, matched as substrings.
///
/// The label is the capitalized first DNS label: `hostinger.com` gives
/// `Hostinger`.
pub struct KnownDomainLayer {
    domains: Vec<String>,
}

impl KnownDomainLayer {
    #[must_use]
    pub fn new(domains: &[String]) -> Self {
        let domains = domains
            .iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }
}

impl SponsorLayer for KnownDomainLayer {
    fn name(&self) -> &'static str {
        "known_domain"
    }

    fn detect(&self, prefix: &Prefix) -> Option<SponsorLabel> {
        let lowered = prefix.lowered();
        self.domains
            .iter()
            .find(|domain| lowered.contains(domain.as_str()))
            .map(|domain| {
                let label = domain.split('.').next().unwrap_or(domain.as_str());
                SponsorLabel::sponsor(&capitalize(label))
            })
    }
}

/// Known brand keywords, matched as whole words in configured order.
pub struct KnownBrandLayer {
    brands: Vec<(String, Regex)>,
}

impl KnownBrandLayer {
    /// # Errors
    ///
    /// Returns [`SponsorError::Pattern`] if a brand pattern fails to compile.
    pub fn new(brands: &[String]) -> Result<Self, SponsorError> {
        let brands = brands
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .map(|b| Ok((b.to_string(), word_pattern(b)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { brands })
    }
}

impl SponsorLayer for KnownBrandLayer {
    fn name(&self) -> &'static str {
        "known_brand"
    }

    fn detect(&self, prefix: &Prefix) -> Option<SponsorLabel> {
        self.brands
            .iter()
            .find(|(_, pattern)| pattern.is_match(prefix.as_str()))
            .map(|(brand, _)| SponsorLabel::sponsor(&capitalize(brand)))
    }
}

/// How a phrase pattern's capture group becomes a label.
#[derive(Clone, Copy)]
enum Capture {
    /// A DNS label out of a URL; capitalized.
    Domain,
    /// Brand text as written; trailing punctuation trimmed.
    Brand,
}

struct PhrasePattern {
    regex: Regex,
    capture: Capture,
}

/// Up to three words: the first capitalized or numeric (optionally with a
/// TLD such as `Monday.com`), the rest capitalized.
const BRAND: &str = r"([A-Z0-9][\w&'-]*(?:\.[a-z]{2,})?(?:[ \t]+[A-Z][\w&'-]*){0,2})";

static PHRASE_PATTERNS: LazyLock<Vec<PhrasePattern>> = LazyLock::new(|| {
    let phrase = |regex: String, capture| PhrasePattern {
        regex: Regex::new(&regex).expect("valid phrase pattern"),
        capture,
    };
    vec![
        phrase(
            r"(?i)https?://(?:www\.)?([a-z0-9][a-z0-9-]*)\.com\S*?[?&]utm_source=".to_string(),
            Capture::Domain,
        ),
        phrase(format!(r"(?i:sponsored\s+by)\s+{BRAND}"), Capture::Brand),
        phrase(format!(r"(?i:partnered\s+with)\s+{BRAND}"), Capture::Brand),
        phrase(
            format!(r"(?i:thanks\s+to)\s+{BRAND}\s+(?i:for\s+sponsoring)"),
            Capture::Brand,
        ),
        phrase(
            r"(?i)https?://(?:www\.)?([a-z0-9][a-z0-9-]*)\.com/[\w\-?=&/%.]+".to_string(),
            Capture::Domain,
        ),
    ]
});

/// Sponsorship phrasing and commercial links.
#[derive(Default)]
pub struct PhrasePatternLayer;

impl SponsorLayer for PhrasePatternLayer {
    fn name(&self) -> &'static str {
        "phrase_pattern"
    }

    fn detect(&self, prefix: &Prefix) -> Option<SponsorLabel> {
        PHRASE_PATTERNS.iter().find_map(|pattern| {
            let captured = pattern.regex.captures(prefix.as_str())?.get(1)?.as_str();
            let label = match pattern.capture {
                Capture::Domain => capitalize(captured),
                Capture::Brand => captured
                    .trim_end_matches(|c: char| c.is_ascii_punctuation())
                    .trim()
                    .to_string(),
            };
            let label = SponsorLabel::sponsor(&label);
            label.is_sponsor().then_some(label)
        })
    }
}

/// The deterministic layers in evaluation order.
///
/// # Errors
///
/// Returns [`SponsorError::Pattern`] if a rule term fails to compile.
pub fn default_layers(rules: &SponsorRules) -> Result<Vec<Box<dyn SponsorLayer>>, SponsorError> {
    let layers: Vec<Box<dyn SponsorLayer>> = vec![
        Box::new(DenyListLayer::new(&rules.deny_list)?) as Box<dyn SponsorLayer>,
        Box::new(KnownDomainLayer::new(&rules.known_domains)),
        Box::new(KnownBrandLayer::new(&rules.known_brands)?),
        Box::new(PhrasePatternLayer),
    ];
    Ok(layers)
}

#[cfg(test)]
#[path = "layers_test.rs"]
mod tests;
