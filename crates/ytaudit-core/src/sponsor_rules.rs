use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_DENY_LIST: &[&str] = &[
    "youtube",
    "instagram",
    "tiktok",
    "twitter",
    "facebook",
    "discord",
    "newsletter",
    "course",
    "x",
    "linkedin",
    "patreon",
    "twitch",
    "threads",
    "reddit",
    "snapchat",
    "spotify",
];

const DEFAULT_KNOWN_DOMAINS: &[&str] = &[
    "clickhubspot",
    "hostinger.com",
    "nordvpn",
    "expressvpn",
    "audible.com",
    "betterhelp.com",
    "squarespace.com",
    "skillshare.com",
    "shopify.com",
];

const DEFAULT_KNOWN_BRANDS: &[&str] = &[
    "nordvpn",
    "hubspot",
    "hostinger",
    "squarespace",
    "skillshare",
    "audible",
    "betterhelp",
    "masterclass",
    "expressvpn",
    "shopify",
    "clickup",
    "monday.com",
];

/// Term lists driving the deterministic classifier layers.
///
/// Entries are stored lowercased and trimmed once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorRules {
    /// Self-referential or platform terms that force "no sponsor".
    #[serde(default)]
    pub deny_list: Vec<String>,
    /// Sponsor domain substrings, e.g. `"hostinger.com"`.
    #[serde(default)]
    pub known_domains: Vec<String>,
    /// Brand keywords matched on word boundaries.
    #[serde(default)]
    pub known_brands: Vec<String>,
}

impl Default for SponsorRules {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| (*s).to_string()).collect();
        Self {
            deny_list: owned(DEFAULT_DENY_LIST),
            known_domains: owned(DEFAULT_KNOWN_DOMAINS),
            known_brands: owned(DEFAULT_KNOWN_BRANDS),
        }
    }
}

impl SponsorRules {
    /// Returns `true` if `label` equals a deny-listed term, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn is_denied(&self, label: &str) -> bool {
        let needle = label.trim().to_lowercase();
        self.deny_list
            .iter()
            .any(|term| term.trim().to_lowercase() == needle)
    }

    fn normalize(&mut self) {
        for list in [
            &mut self.deny_list,
            &mut self.known_domains,
            &mut self.known_brands,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
        }
    }
}

/// Load, normalize, and validate sponsor rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sponsor_rules(path: &Path) -> Result<SponsorRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sponsor_rules(&content)
}

/// Parse sponsor rules from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_sponsor_rules(content: &str) -> Result<SponsorRules, ConfigError> {
    let mut rules: SponsorRules =
        serde_yaml::from_str(content).map_err(ConfigError::RulesFileParse)?;
    rules.normalize();
    validate_rules(&rules)?;
    Ok(rules)
}

fn validate_rules(rules: &SponsorRules) -> Result<(), ConfigError> {
    validate_list("deny_list", &rules.deny_list)?;
    validate_list("known_domains", &rules.known_domains)?;
    validate_list("known_brands", &rules.known_brands)?;
    Ok(())
}

fn validate_list(list_name: &str, entries: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in entries {
        if entry.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{list_name} entries must be non-empty"
            )));
        }

        if !seen.insert(entry.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate {list_name} entry: '{entry}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sponsor_rules_test.rs"]
mod tests;
