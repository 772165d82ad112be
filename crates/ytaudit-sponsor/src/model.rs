//! Generative-model fallback: asks a chat-completions endpoint to name the
//! sponsor when no deterministic layer decided.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ClassificationFailure, SponsorError};

const SYSTEM_PROMPT: &str = "You extract sponsor brands from YouTube video descriptions. \
A sponsor is an external company paying for promotion. The creator's own channels, \
merchandise, courses and social media platforms are never sponsors. \
Reply with JSON: {\"sponsor\": \"<brand name or None>\"}.";

const FEW_SHOT: &str = "Examples:\n\
\"Check out Hostinger here\" -> {\"sponsor\": \"Hostinger\"}\n\
\"Get 30% off NordVPN\" -> {\"sponsor\": \"NordVPN\"}\n\
\"Watch this on YouTube\" -> {\"sponsor\": \"None\"}";

/// Replies that mean "no sponsor", compared case-insensitively.
const NONE_ANSWERS: &[&str] = &["none", "no sponsor", "n/a", "null", ""];

/// A service that names the sponsor in a description prefix.
#[async_trait]
pub trait SponsorModel: Send + Sync {
    /// `Ok(None)` means the model found no sponsor.
    async fn extract_sponsor(&self, prefix: &str) -> Result<Option<String>, ClassificationFailure>;
}

/// `OpenAI`-compatible chat-completions client.
pub struct OpenAiSponsorModel {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiSponsorModel {
    /// # Errors
    ///
    /// Returns [`SponsorError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, SponsorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl SponsorModel for OpenAiSponsorModel {
    async fn extract_sponsor(&self, prefix: &str) -> Result<Option<String>, ClassificationFailure> {
        let req_body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!("{FEW_SHOT}\n\nDescription:\n{prefix}")
                }
            ],
            "temperature": 0,
            "max_tokens": 30
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&req_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassificationFailure::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let content = body
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ClassificationFailure::MalformedResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })?;

        parse_model_answer(content)
    }
}

/// Interpret a model reply as a sponsor name.
///
/// Accepts `{"sponsor": "..."}` (a `null` value counts as none) or a bare
/// string.
///
/// # Errors
///
/// Returns [`ClassificationFailure::MalformedResponse`] if the reply is a
/// JSON object without a string or null `sponsor` field.
pub fn parse_model_answer(content: &str) -> Result<Option<String>, ClassificationFailure> {
    let trimmed = content.trim();
    let raw = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("sponsor") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) => return Ok(None),
            _ => {
                return Err(ClassificationFailure::MalformedResponse(format!(
                    "expected a \"sponsor\" string in {trimmed}"
                )))
            }
        },
        Ok(Value::String(s)) => s,
        _ => trimmed.to_string(),
    };

    let cleaned = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`'))
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | ';' | ':'))
        .trim();

    if NONE_ANSWERS
        .iter()
        .any(|none| cleaned.eq_ignore_ascii_case(none))
    {
        Ok(None)
    } else {
        Ok(Some(cleaned.to_string()))
    }
}
