//! Description prefix extraction.
//!
//! Sponsorship calls-to-action sit at the top of a description, so only the
//! first few non-empty lines are classified. The joined prefix doubles as
//! the cache key: descriptions sharing those lines share a verdict.

/// The first `max_lines` non-empty, trimmed lines of a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    text: String,
    lowered: String,
}

impl Prefix {
    #[must_use]
    pub fn from_description(description: &str, max_lines: usize) -> Self {
        let text = description
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n");
        let lowered = text.to_lowercase();
        Self { text, lowered }
    }

    /// The prefix as written, lines joined with `\n`. Also the cache key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_non_empty_trimmed_lines() {
        let description = "\n  Get 30% off NordVPN  \n\n\tFollow me\nline three\nline four\n";
        let prefix = Prefix::from_description(description, 3);
        assert_eq!(prefix.as_str(), "Get 30% off NordVPN\nFollow me\nline three");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let prefix = Prefix::from_description("one\r\ntwo\r\n", 5);
        assert_eq!(prefix.as_str(), "one\ntwo");
    }

    #[test]
    fn lowered_mirrors_text() {
        let prefix = Prefix::from_description("Try HubSpot", 5);
        assert_eq!(prefix.lowered(), "try hubspot");
    }

    #[test]
    fn blank_description_is_empty() {
        assert!(Prefix::from_description("  \n\n \t", 5).is_empty());
        assert!(Prefix::from_description("", 5).is_empty());
    }

    #[test]
    fn descriptions_sharing_leading_lines_share_a_prefix() {
        let a = "Sponsor line\nsecond\nthird\nfourth\nfifth\nsixth differs A";
        let b = "Sponsor line\nsecond\nthird\nfourth\nfifth\nsixth differs B\nmore";
        assert_eq!(
            Prefix::from_description(a, 5),
            Prefix::from_description(b, 5)
        );
    }
}
