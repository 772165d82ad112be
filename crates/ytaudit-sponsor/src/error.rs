use thiserror::Error;

/// Errors building a classifier or model client.
#[derive(Debug, Error)]
pub enum SponsorError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A failure inside the generative-model layer.
///
/// Never escapes [`crate::SponsorClassifier::classify`]: it is logged and
/// downgraded to "no sponsor".
#[derive(Debug, Error)]
pub enum ClassificationFailure {
    /// Network failure or timeout talking to the model endpoint.
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model endpoint returned status {0}")]
    Status(u16),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}
