//! Shared domain types and configuration for the sponsor audit tool.

pub mod app_config;
pub mod config;
pub mod sponsor_rules;
pub mod videos;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_PREFIX_LINES};
pub use sponsor_rules::{load_sponsor_rules, parse_sponsor_rules, SponsorRules};
pub use videos::{
    ChannelMetadata, RawVideo, SponsorLabel, VideoRecord, MAX_VIDEO_LIMIT, MIN_VIDEO_LIMIT,
    WATCH_URL_BASE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sponsor rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sponsor rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("sponsor rules validation failed: {0}")]
    Validation(String),
}
