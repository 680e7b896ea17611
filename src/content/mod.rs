pub mod embed;
pub mod mock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use mock::MockContentProvider;

#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("Content request failed: {0}")]
    Request(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum FeedMediaType {
    Image,
    Video,
    CarouselAlbum,
}

/// One post as the content provider returns it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeedMedia {
    pub id: String,
    pub caption: String,
    pub media_type: FeedMediaType,
    pub media_url: String,
    pub username: String,
    pub profile_image: String,
    pub timestamp: DateTime<Utc>,
}

/// A playable entry in the video feed. `id` doubles as the interaction key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeedVideo {
    pub id: String,
    pub username: String,
    pub description: String,
    pub profile_image: String,
    pub video_url: String,
}

impl From<FeedMedia> for FeedVideo {
    fn from(media: FeedMedia) -> Self {
        FeedVideo {
            id: media.media_url.clone(),
            username: media.username,
            description: media.caption,
            profile_image: media.profile_image,
            video_url: media.media_url,
        }
    }
}

/// Source of feed posts (a hashtag search against a social network, or a mock).
#[async_trait]
pub trait ContentProvider: Send + Sync + 'static {
    async fn fetch_feed_media(&self) -> Result<Vec<FeedMedia>, ContentError>;
}

/// Fetches the feed and keeps only videos. Failures are logged and yield an
/// empty feed; they never reach the caller.
pub async fn load_feed(provider: &dyn ContentProvider) -> Vec<FeedVideo> {
    match provider.fetch_feed_media().await {
        Ok(media) => {
            let videos: Vec<FeedVideo> = media
                .into_iter()
                .filter(|m| m.media_type == FeedMediaType::Video)
                .map(FeedVideo::from)
                .collect();
            tracing::debug!(video_count = videos.len(), "Feed content loaded");
            videos
        }
        Err(e) => {
            tracing::error!(error = %e, "Error loading feed content");
            Vec::new()
        }
    }
}
