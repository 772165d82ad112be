use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base URL used to build canonical watch links.
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Smallest accepted `--limit` for an audit run.
pub const MIN_VIDEO_LIMIT: u32 = 10;
/// Largest accepted `--limit` for an audit run.
pub const MAX_VIDEO_LIMIT: u32 = 100;

/// Outcome of classifying one description.
///
/// `Sponsor` always holds a non-empty, trimmed brand token. Use
/// [`SponsorLabel::sponsor`] to build one from untrusted text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SponsorLabel {
    #[default]
    None,
    Sponsor(String),
}

impl SponsorLabel {
    /// Builds a label from raw text, collapsing blank input to [`SponsorLabel::None`].
    #[must_use]
    pub fn sponsor(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            SponsorLabel::None
        } else {
            SponsorLabel::Sponsor(trimmed.to_string())
        }
    }

    /// The label as exported: empty for no sponsor.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SponsorLabel::None => "",
            SponsorLabel::Sponsor(name) => name,
        }
    }

    #[must_use]
    pub fn is_sponsor(&self) -> bool {
        matches!(self, SponsorLabel::Sponsor(_))
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            SponsorLabel::None => String::new(),
            SponsorLabel::Sponsor(name) => name,
        }
    }
}

impl std::fmt::Display for SponsorLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SponsorLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Channel-level metadata shown in the report header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub id: String,
    pub title: String,
    pub description: String,
    /// ISO 3166 country code, when the channel sets one.
    pub country: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    /// `None` when the channel hides its subscriber count.
    pub subscriber_count: Option<u64>,
    pub video_count: Option<u64>,
    pub view_count: Option<u64>,
}

/// A video as fetched from the platform, before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl RawVideo {
    /// Canonical watch URL for this video.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("{WATCH_URL_BASE}{}", self.id)
    }

    /// Attaches the classifier's verdict, producing the exported record.
    ///
    /// This is the only place a record's `sponsor` is assigned.
    #[must_use]
    pub fn into_record(self, sponsor: SponsorLabel) -> VideoRecord {
        let url = self.watch_url();
        VideoRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            published_at: self.published_at,
            views: self.views,
            likes: self.likes,
            comments: self.comments,
            url,
            sponsor: sponsor.into_string(),
        }
    }
}

/// A classified video, one row of the per-video export.
///
/// `sponsor` is empty when no sponsor was detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub url: String,
    pub sponsor: String,
}

impl VideoRecord {
    #[must_use]
    pub fn is_sponsored(&self) -> bool {
        !self.sponsor.is_empty()
    }
}
