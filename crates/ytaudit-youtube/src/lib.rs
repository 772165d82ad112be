//! `YouTube` Data API v3 client for channel and upload metadata.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{parse_channel_url, ChannelRef, YoutubeClient};
pub use error::YoutubeError;
