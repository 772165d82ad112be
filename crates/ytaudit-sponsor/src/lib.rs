//! Sponsor classification for `YouTube` video descriptions.
//!
//! A layered classifier (deny list, known domains, known brands, phrase
//! patterns, then an optional generative model) labels each description's
//! leading lines. Labels are memoized per prefix, and sponsored videos are
//! aggregated into per-sponsor and per-topic engagement summaries.

pub mod aggregate;
pub mod cache;
pub mod classifier;
pub mod error;
pub mod layers;
pub mod model;
pub mod pipeline;
pub mod prefix;

pub use aggregate::{summarize, summarize_topics, topic_for_title, SponsorSummary};
pub use cache::SponsorCache;
pub use classifier::{ClassifierStats, SponsorClassifier};
pub use error::{ClassificationFailure, SponsorError};
pub use layers::{capitalize, SponsorLayer};
pub use model::{parse_model_answer, OpenAiSponsorModel, SponsorModel};
pub use pipeline::classify_videos;
pub use prefix::Prefix;
