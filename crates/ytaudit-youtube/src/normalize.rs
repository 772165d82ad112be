//! Conversion of `YouTube` API items into the audit's domain types.

use ytaudit_core::{ChannelMetadata, RawVideo};

use crate::types::{ChannelItem, VideoItem};

/// Parses a decimal count string as returned by the statistics endpoints.
///
/// Returns `None` for absent or non-numeric values.
#[must_use]
pub fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

/// Converts a `channels` item into [`ChannelMetadata`].
///
/// Hidden subscriber counts map to `None` even if the API still sends a
/// rounded value.
#[must_use]
pub fn normalize_channel(item: ChannelItem) -> ChannelMetadata {
    let stats = item.statistics;
    let subscriber_count = if stats.hidden_subscriber_count {
        None
    } else {
        parse_count(stats.subscriber_count.as_deref())
    };

    ChannelMetadata {
        id: item.id,
        title: item.snippet.title,
        description: item.snippet.description,
        country: item.snippet.country.filter(|c| !c.is_empty()),
        published_at: item.snippet.published_at,
        subscriber_count,
        video_count: parse_count(stats.video_count.as_deref()),
        view_count: parse_count(stats.view_count.as_deref()),
    }
}

/// Converts a `videos` item into a [`RawVideo`]. Missing counts become 0.
#[must_use]
pub fn normalize_video(item: VideoItem) -> RawVideo {
    let stats = item.statistics;
    RawVideo {
        id: item.id,
        title: item.snippet.title,
        description: item.snippet.description,
        published_at: item.snippet.published_at,
        views: parse_count(stats.view_count.as_deref()).unwrap_or(0),
        likes: parse_count(stats.like_count.as_deref()).unwrap_or(0),
        comments: parse_count(stats.comment_count.as_deref()).unwrap_or(0),
    }
}
