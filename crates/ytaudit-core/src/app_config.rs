use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub log_level: String,
    pub sponsor_rules_path: PathBuf,
    pub request_timeout_secs: u64,
    pub model_timeout_secs: u64,
    /// Number of leading non-empty description lines used for classification.
    pub prefix_lines: usize,
    pub classify_concurrency: usize,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("log_level", &self.log_level)
            .field("sponsor_rules_path", &self.sponsor_rules_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("prefix_lines", &self.prefix_lines)
            .field("classify_concurrency", &self.classify_concurrency)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
