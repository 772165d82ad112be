//! Per-sponsor and per-topic engagement summaries.

use std::collections::HashMap;

use serde::Serialize;
use ytaudit_core::VideoRecord;

/// Mean engagement for one group of sponsored videos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SponsorSummary {
    /// Sponsor name, or topic when produced by [`summarize_topics`].
    pub label: String,
    pub mean_views: f64,
    pub mean_likes: f64,
    pub mean_comments: f64,
    pub video_count: usize,
}

/// Group sponsored records by sponsor, sorted by mean views descending.
#[must_use]
pub fn summarize(records: &[VideoRecord]) -> Vec<SponsorSummary> {
    group_sponsored(records, |record| record.sponsor.clone())
}

/// Group sponsored records by [`topic_for_title`], sorted by mean views
/// descending.
#[must_use]
pub fn summarize_topics(records: &[VideoRecord]) -> Vec<SponsorSummary> {
    group_sponsored(records, |record| topic_for_title(&record.title))
}

/// The title's topic: text before the first `|`, else before the first `:`,
/// trimmed. Falls back to the whole trimmed title when that is empty.
#[must_use]
pub fn topic_for_title(title: &str) -> String {
    let head = title
        .split_once('|')
        .or_else(|| title.split_once(':'))
        .map_or(title, |(head, _)| head)
        .trim();
    if head.is_empty() {
        title.trim().to_string()
    } else {
        head.to_string()
    }
}

#[derive(Default)]
struct Totals {
    views: u64,
    likes: u64,
    comments: u64,
    count: usize,
}

#[allow(clippy::cast_precision_loss)]
fn mean(total: u64, count: usize) -> f64 {
    total as f64 / count as f64
}

/// Groups keep first-appearance order before the stable sort, so ties stay
/// in input order.
fn group_sponsored<F>(records: &[VideoRecord], key: F) -> Vec<SponsorSummary>
where
    F: Fn(&VideoRecord) -> String,
{
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, Totals> = HashMap::new();

    for record in records.iter().filter(|r| r.is_sponsored()) {
        let label = key(record);
        let entry = totals.entry(label.clone()).or_insert_with(|| {
            order.push(label);
            Totals::default()
        });
        entry.views = entry.views.saturating_add(record.views);
        entry.likes = entry.likes.saturating_add(record.likes);
        entry.comments = entry.comments.saturating_add(record.comments);
        entry.count += 1;
    }

    let mut summaries: Vec<SponsorSummary> = order
        .into_iter()
        .filter_map(|label| {
            let t = totals.remove(&label)?;
            Some(SponsorSummary {
                mean_views: mean(t.views, t.count),
                mean_likes: mean(t.likes, t.count),
                mean_comments: mean(t.comments, t.count),
                video_count: t.count,
                label,
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.mean_views.total_cmp(&a.mean_views));
    summaries
}
