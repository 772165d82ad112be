//! `audit` command: fetch a channel's recent uploads, classify their
//! sponsors, and emit the reports.
//!
//! Fetch errors abort the run. Classification never does: model failures
//! are absorbed per video by the classifier.

mod report;

use std::path::PathBuf;

use ytaudit_core::{AppConfig, ConfigError};
use ytaudit_sponsor::{classify_videos, summarize, summarize_topics};
use ytaudit_youtube::YoutubeClient;

use crate::sponsors::{build_classifier, load_rules};

use report::AuditReport;

/// Resolved options for one audit run.
#[derive(Debug)]
pub(crate) struct AuditOptions {
    pub url: String,
    pub limit: u32,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub prefix_lines: usize,
    pub rules: Option<PathBuf>,
    pub json: bool,
}

/// Run a full channel audit.
///
/// # Errors
///
/// Returns an error if `YOUTUBE_API_KEY` is missing, the URL is not a
/// channel URL, a `YouTube` API call fails, the rules file is invalid, or
/// the CSV files cannot be written.
pub(crate) async fn run_audit(config: &AppConfig, options: &AuditOptions) -> anyhow::Result<()> {
    let api_key = config
        .youtube_api_key
        .as_deref()
        .ok_or_else(|| ConfigError::MissingEnvVar("YOUTUBE_API_KEY".to_string()))?;
    let client = YoutubeClient::new(api_key, config.request_timeout_secs, &config.user_agent)?;

    let channel_id = match client.resolve_channel_id(&options.url).await {
        Ok(id) => id,
        Err(e) if e.is_not_found() => {
            println!("No channel found for {}.", options.url);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let channel = match client.fetch_channel_metadata(&channel_id).await {
        Ok(channel) => channel,
        Err(e) if e.is_not_found() => {
            println!("No channel found for {}.", options.url);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(channel_id = %channel.id, title = %channel.title, "resolved channel");

    let videos = match client.fetch_recent_videos(&channel_id, options.limit).await {
        Ok(videos) => videos,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    if videos.is_empty() {
        println!("No videos found on this channel.");
        return Ok(());
    }
    tracing::info!(videos = videos.len(), "fetched recent uploads");

    let rules = load_rules(config, options.rules.as_deref())?;
    let classifier = build_classifier(config, rules, options.prefix_lines)?;
    let records = classify_videos(&classifier, videos, options.concurrency).await;

    let report = AuditReport {
        sponsors: summarize(&records),
        topics: summarize_topics(&records),
        stats: classifier.stats(),
        channel,
        videos: records,
    };

    let written = report::write_csv_files(&options.output_dir, &report)?;
    for path in &written {
        tracing::info!(path = %path.display(), "wrote report file");
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_markdown(&report));
    }

    tracing::info!(
        videos = report.videos.len(),
        sponsored = report.sponsored_count(),
        cache_hits = report.stats.cache_hits,
        cache_misses = report.stats.cache_misses,
        model_calls = report.stats.model_calls,
        "audit complete"
    );
    Ok(())
}
