//! CSV exports and the markdown report for an audit run.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::SecondsFormat;
use serde::Serialize;
use ytaudit_core::{ChannelMetadata, VideoRecord};
use ytaudit_sponsor::{ClassifierStats, SponsorSummary};

/// Per-video export columns. Downstream spreadsheets depend on these names.
const VIDEO_COLUMNS: &str =
    "videoId,title,description,publishedAt,views,likes,comments,video_url,sponsor";

const SUMMARY_COLUMNS: &str = "sponsor,views,likes,comments,video_count";

/// Everything one audit run produced. Also the `--json` output shape.
#[derive(Debug, Serialize)]
pub(crate) struct AuditReport {
    pub channel: ChannelMetadata,
    pub videos: Vec<VideoRecord>,
    pub sponsors: Vec<SponsorSummary>,
    pub topics: Vec<SponsorSummary>,
    pub stats: ClassifierStats,
}

impl AuditReport {
    pub(crate) fn sponsored_count(&self) -> usize {
        self.videos.iter().filter(|v| v.is_sponsored()).count()
    }
}

/// Write `<stem>_channel_analysis.csv` and `<stem>_sponsor_summary.csv`
/// into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or either file cannot be written.
pub(crate) fn write_csv_files(dir: &Path, report: &AuditReport) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let stem = file_stem(&report.channel.title);
    let files = [
        (
            dir.join(format!("{stem}_channel_analysis.csv")),
            videos_csv(&report.videos),
        ),
        (
            dir.join(format!("{stem}_sponsor_summary.csv")),
            summary_csv(&report.sponsors),
        ),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (path, contents) in files {
        std::fs::write(&path, contents)
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Channel title as a file-name stem: spaces become `_`, path separators and
/// control characters are dropped.
pub(crate) fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\') && !c.is_control())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    if stem.is_empty() {
        "channel".to_string()
    } else {
        stem
    }
}

pub(crate) fn videos_csv(videos: &[VideoRecord]) -> String {
    let mut out = String::from(VIDEO_COLUMNS);
    out.push('\n');
    for video in videos {
        let published = video
            .published_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let row = [
            csv_field(&video.id),
            csv_field(&video.title),
            csv_field(&video.description),
            Cow::Owned(published),
            Cow::Owned(video.views.to_string()),
            Cow::Owned(video.likes.to_string()),
            Cow::Owned(video.comments.to_string()),
            csv_field(&video.url),
            csv_field(&video.sponsor),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

pub(crate) fn summary_csv(summaries: &[SponsorSummary]) -> String {
    let mut out = String::from(SUMMARY_COLUMNS);
    out.push('\n');
    for s in summaries {
        out.push_str(&format!(
            "{},{:.1},{:.1},{:.1},{}\n",
            csv_field(&s.label),
            s.mean_views,
            s.mean_likes,
            s.mean_comments,
            s.video_count
        ));
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub(crate) fn render_markdown(report: &AuditReport) -> String {
    let channel = &report.channel;
    let subscribers = channel
        .subscriber_count
        .map_or_else(|| "hidden".to_string(), thousands);

    let mut lines = vec![
        format!("# Sponsor Audit: {}", channel.title),
        String::new(),
        format!("**Channel ID**: {}", channel.id),
        format!("**Subscribers**: {subscribers}"),
        format!("**Videos analyzed**: {}", report.videos.len()),
        format!("**Sponsored videos**: {}", report.sponsored_count()),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Top Performing Sponsors".to_string(),
        String::new(),
    ];
    push_summary_table(&mut lines, "Sponsor", &report.sponsors, "No sponsors detected.");

    lines.push(String::new());
    lines.push("## Top Performing Sponsored Topics".to_string());
    lines.push(String::new());
    push_summary_table(&mut lines, "Topic", &report.topics, "No sponsored topics found.");

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_summary_table(
    lines: &mut Vec<String>,
    label_header: &str,
    summaries: &[SponsorSummary],
    empty_message: &str,
) {
    if summaries.is_empty() {
        lines.push(empty_message.to_string());
        return;
    }

    lines.push(format!(
        "| {label_header} | Avg Views | Avg Likes | Avg Comments | Videos |"
    ));
    lines.push("|---|---:|---:|---:|---:|".to_string());
    for s in summaries {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            s.label.replace('|', "\\|"),
            mean_thousands(s.mean_views),
            mean_thousands(s.mean_likes),
            mean_thousands(s.mean_comments),
            s.video_count
        ));
    }
}

/// Round a non-negative mean and group its digits, e.g. `1234.6` gives `1,235`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mean_thousands(value: f64) -> String {
    thousands(value.round().max(0.0) as u64)
}

fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
