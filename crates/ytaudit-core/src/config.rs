use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default number of description lines that make up a classification prefix.
pub const DEFAULT_PREFIX_LINES: usize = 5;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `.env` templates can leave keys empty.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    // A zero timeout would make reqwest fail every request immediately.
    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let openai_api_key = optional("OPENAI_API_KEY");
    let openai_base_url = or_default("YTAUDIT_OPENAI_BASE_URL", "https://api.openai.com/v1");
    let openai_model = or_default("YTAUDIT_OPENAI_MODEL", "gpt-4o-mini");
    let log_level = or_default("YTAUDIT_LOG_LEVEL", "info");
    let sponsor_rules_path = PathBuf::from(or_default(
        "YTAUDIT_SPONSOR_RULES_PATH",
        "./config/sponsors.yaml",
    ));

    let request_timeout_secs = parse_positive_u64("YTAUDIT_REQUEST_TIMEOUT_SECS", "30")?;
    let model_timeout_secs = parse_positive_u64("YTAUDIT_MODEL_TIMEOUT_SECS", "20")?;
    let prefix_lines = parse_positive_usize(
        "YTAUDIT_PREFIX_LINES",
        &DEFAULT_PREFIX_LINES.to_string(),
    )?;
    let classify_concurrency = parse_positive_usize("YTAUDIT_CLASSIFY_CONCURRENCY", "1")?;
    let user_agent = or_default("YTAUDIT_USER_AGENT", "ytaudit/0.1 (sponsor-audit)");

    Ok(AppConfig {
        youtube_api_key,
        openai_api_key,
        openai_base_url,
        openai_model,
        log_level,
        sponsor_rules_path,
        request_timeout_secs,
        model_timeout_secs,
        prefix_lines,
        classify_concurrency,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
