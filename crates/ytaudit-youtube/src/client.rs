//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and the channel URL forms the audit accepts. Non-2xx responses surface as
//! [`YoutubeError::Api`] carrying the API's own error message. There is no
//! retry; callers decide what a failed fetch means for their run.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use ytaudit_core::{ChannelMetadata, RawVideo, MAX_VIDEO_LIMIT};

use crate::error::YoutubeError;
use crate::normalize::{normalize_channel, normalize_video};
use crate::types::{
    ApiErrorResponse, ChannelContentItem, ChannelItem, ListResponse, PlaylistItem, SearchItem,
    VideoItem,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// The API caps `maxResults` and the `id` list of `videos` at 50.
const MAX_PAGE_SIZE: usize = 50;

/// A channel reference parsed from a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// `https://www.youtube.com/channel/<id>`
    Id(String),
    /// `https://www.youtube.com/@<handle>`, resolved through search.
    Handle(String),
}

/// Parses a channel URL into a [`ChannelRef`].
///
/// Accepts `/channel/<id>` and `/@<handle>` paths; anything after the id or
/// handle (further path segments, query, fragment) is ignored.
///
/// # Errors
///
/// Returns [`YoutubeError::InvalidInput`] for any other shape, or when the
/// id/handle segment is empty.
pub fn parse_channel_url(url: &str) -> Result<ChannelRef, YoutubeError> {
    let trimmed = url.trim();

    if let Some((_, rest)) = trimmed.split_once("/channel/") {
        let id = first_segment(rest);
        if id.is_empty() {
            return Err(YoutubeError::InvalidInput(format!(
                "channel URL has an empty channel id: {trimmed}"
            )));
        }
        return Ok(ChannelRef::Id(id.to_string()));
    }

    if let Some((_, rest)) = trimmed.split_once("/@") {
        let handle = first_segment(rest);
        if handle.is_empty() {
            return Err(YoutubeError::InvalidInput(format!(
                "channel URL has an empty handle: {trimmed}"
            )));
        }
        return Ok(ChannelRef::Handle(handle.to_string()));
    }

    Err(YoutubeError::InvalidInput(format!(
        "expected a /channel/<id> or /@<handle> URL, got: {trimmed}"
    )))
}

fn first_segment(rest: &str) -> &str {
    rest.split(['/', '?', '#']).next().unwrap_or("").trim()
}

/// Client for the `YouTube` Data API v3.
///
/// Use [`YoutubeClient::new`] for production or [`YoutubeClient::with_base_url`]
/// to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidInput`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `Url::join` appends the endpoint
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            YoutubeError::InvalidInput(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolves a channel URL to a channel id.
    ///
    /// `/channel/<id>` URLs resolve locally; `/@handle` URLs cost one
    /// `search` call.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::InvalidInput`] if the URL matches neither form.
    /// - [`YoutubeError::NotFound`] if the handle search returns no channel.
    /// - [`YoutubeError::Http`], [`YoutubeError::Api`], or
    ///   [`YoutubeError::Deserialize`] if the search call fails.
    pub async fn resolve_channel_id(&self, url: &str) -> Result<String, YoutubeError> {
        match parse_channel_url(url)? {
            ChannelRef::Id(id) => Ok(id),
            ChannelRef::Handle(handle) => {
                let query = format!("@{handle}");
                let response: ListResponse<SearchItem> = self
                    .get_json(
                        "search",
                        &[
                            ("part", "snippet"),
                            ("type", "channel"),
                            ("q", &query),
                            ("maxResults", "1"),
                        ],
                    )
                    .await?;

                let channel_id = response
                    .items
                    .into_iter()
                    .next()
                    .map(|item| item.snippet.channel_id)
                    .ok_or_else(|| YoutubeError::NotFound(format!("no channel for handle {query}")))?;

                tracing::debug!(handle = %query, channel_id = %channel_id, "resolved channel handle");
                Ok(channel_id)
            }
        }
    }

    /// Fetches title, description, and statistics for a channel.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::NotFound`] if the channel id matches nothing.
    /// - [`YoutubeError::Http`], [`YoutubeError::Api`], or
    ///   [`YoutubeError::Deserialize`] on fetch failure.
    pub async fn fetch_channel_metadata(
        &self,
        channel_id: &str,
    ) -> Result<ChannelMetadata, YoutubeError> {
        let response: ListResponse<ChannelItem> = self
            .get_json(
                "channels",
                &[("part", "snippet,statistics"), ("id", channel_id)],
            )
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(normalize_channel)
            .ok_or_else(|| YoutubeError::NotFound(format!("channel {channel_id}")))
    }

    /// Fetches up to `limit` of the channel's most recent uploads, newest first.
    ///
    /// Walks the uploads playlist page by page, then batch-fetches snippets
    /// and statistics. Videos the `videos` endpoint no longer returns
    /// (deleted or private) are skipped.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::InvalidInput`] if `limit` is 0 or above
    ///   [`MAX_VIDEO_LIMIT`].
    /// - [`YoutubeError::NotFound`] if the channel id matches nothing.
    /// - [`YoutubeError::Http`], [`YoutubeError::Api`], or
    ///   [`YoutubeError::Deserialize`] on fetch failure.
    pub async fn fetch_recent_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<RawVideo>, YoutubeError> {
        if limit == 0 || limit > MAX_VIDEO_LIMIT {
            return Err(YoutubeError::InvalidInput(format!(
                "video limit must be between 1 and {MAX_VIDEO_LIMIT}, got {limit}"
            )));
        }
        let limit = limit as usize;

        let uploads = self.uploads_playlist_id(channel_id).await?;
        let video_ids = self.playlist_video_ids(&uploads, limit).await?;
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<String, VideoItem> = HashMap::with_capacity(video_ids.len());
        for chunk in video_ids.chunks(MAX_PAGE_SIZE) {
            let ids = chunk.join(",");
            let response: ListResponse<VideoItem> = self
                .get_json("videos", &[("part", "snippet,statistics"), ("id", &ids)])
                .await?;
            by_id.extend(response.items.into_iter().map(|v| (v.id.clone(), v)));
        }

        let videos: Vec<RawVideo> = video_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(normalize_video)
            .collect();

        if videos.len() < video_ids.len() {
            tracing::debug!(
                channel_id,
                requested = video_ids.len(),
                returned = videos.len(),
                "some playlist videos were not returned by the videos endpoint"
            );
        }

        Ok(videos)
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, YoutubeError> {
        let response: ListResponse<ChannelContentItem> = self
            .get_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(|item| item.content_details.related_playlists.uploads)
            .ok_or_else(|| YoutubeError::NotFound(format!("channel {channel_id}")))
    }

    async fn playlist_video_ids(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Vec<String>, YoutubeError> {
        let mut ids = Vec::with_capacity(limit);
        let mut page_token: Option<String> = None;

        while ids.len() < limit {
            let page_size = (limit - ids.len()).min(MAX_PAGE_SIZE).to_string();
            let response: ListResponse<PlaylistItem> = {
                let mut params = vec![
                    ("part", "snippet"),
                    ("playlistId", playlist_id),
                    ("maxResults", page_size.as_str()),
                ];
                if let Some(token) = page_token.as_deref() {
                    params.push(("pageToken", token));
                }
                self.get_json("playlistItems", &params).await?
            };
            ids.extend(
                response
                    .items
                    .into_iter()
                    .map(|item| item.snippet.resource_id.video_id),
            );

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        ids.truncate(limit);
        Ok(ids)
    }

    /// Builds the request URL for `endpoint` with percent-encoded query
    /// parameters. The API key is always appended first.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self.base_url.join(endpoint).map_err(|e| {
            YoutubeError::InvalidInput(format!("invalid endpoint '{endpoint}': {e}"))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request and deserializes a 2xx JSON body into `T`.
    ///
    /// URLs are stripped from transport errors so the API key never reaches
    /// logs.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YoutubeError> {
        let url = self.build_url(endpoint, params)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| YoutubeError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| YoutubeError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: endpoint.to_string(),
            source: e,
        })
    }
}

/// Extracts `error.message` from an API error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|r| r.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
