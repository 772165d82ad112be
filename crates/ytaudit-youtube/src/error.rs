use thiserror::Error;

/// Errors returned by the `YouTube` Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// The channel URL matched neither accepted form, or a parameter was out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The lookup succeeded but returned no items.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("YouTube API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl YoutubeError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, YoutubeError::NotFound(_))
    }

    /// `true` for failures talking to the API, as opposed to bad input or empty results.
    #[must_use]
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            YoutubeError::Http(_) | YoutubeError::Api { .. } | YoutubeError::Deserialize { .. }
        )
    }
}
