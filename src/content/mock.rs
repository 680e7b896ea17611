use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::{ContentError, ContentProvider, FeedMedia, FeedMediaType};

/// Serves a fixed set of posts after a simulated network delay.
#[derive(Debug, Clone)]
pub struct MockContentProvider {
    delay: Duration,
}

impl MockContentProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockContentProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl ContentProvider for MockContentProvider {
    async fn fetch_feed_media(&self) -> Result<Vec<FeedMedia>, ContentError> {
        tokio::time::sleep(self.delay).await;
        Ok(feed_media())
    }
}

pub fn feed_media() -> Vec<FeedMedia> {
    const BUCKET: &str = "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample";
    [
        ("1", "MacBook Pro M3 Max Review - The FASTEST Mac Ever! #bestbuy #apple #tech",
            "TearsOfSteel.mp4", "techreviewpro", "men/1"),
        ("2", "iPhone 15 Pro Max vs Samsung S24 Ultra Camera Test! #bestbuy #smartphones",
            "Sintel.mp4", "gadgetmaster", "women/2"),
        ("3", "Best Gaming Laptops of 2024 at Best Buy! RTX 4090 Beasts 🔥 #bestbuy #gaming #laptops",
            "SubaruOutbackOnStreetAndDirt.mp4", "techgeekreviews", "men/3"),
    ]
    .into_iter()
    .map(|(id, caption, file, username, portrait)| FeedMedia {
        id: id.to_string(),
        caption: caption.to_string(),
        media_type: FeedMediaType::Video,
        media_url: format!("{BUCKET}/{file}"),
        username: username.to_string(),
        profile_image: format!("https://randomuser.me/api/portraits/{portrait}.jpg"),
        timestamp: Utc::now(),
    })
    .collect()
}
