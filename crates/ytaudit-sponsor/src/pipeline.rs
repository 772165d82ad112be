//! Classification pipeline over a channel's fetched videos.

use futures::stream::{self, StreamExt};
use ytaudit_core::{RawVideo, VideoRecord};

use crate::classifier::SponsorClassifier;

/// Classify every video and attach its sponsor label.
///
/// Up to `concurrency` classifications run at once (minimum 1). Output order
/// matches input order.
pub async fn classify_videos(
    classifier: &SponsorClassifier,
    videos: Vec<RawVideo>,
    concurrency: usize,
) -> Vec<VideoRecord> {
    stream::iter(videos)
        .map(|video| async move {
            let label = classifier.classify(&video.description).await;
            tracing::debug!(video_id = %video.id, sponsor = %label, "classified video");
            video.into_record(label)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
