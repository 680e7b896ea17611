use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::content::FeedVideo;
use crate::content::embed::Playback;
use crate::player::{FeedNavigator, PlayerState, SlideDirection};
use crate::store::{CartItem, Comment};

/// Commands a front end sends, one per user gesture or timer the client owns.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "data")]
#[ts(export)]
pub enum ClientCommand {
    // story viewer
    OpenStory { index: usize },
    CloseStory,
    NextStoryItem,
    PreviousStoryItem,
    ToggleStoryPause,
    StoryTouchStart { x: f64, y: f64 },
    StoryTouchMove { x: f64, y: f64 },
    StoryTouchEnd,
    StoryMediaDuration { seconds: f64 },

    // video feed
    OpenVideo { index: usize },
    CloseVideo,
    NextVideo,
    PreviousVideo,
    /// `delta_y` is `start_y - end_y`. Missing edge flags are derived from the cursor.
    SwipeVideo {
        delta_y: f64,
        #[serde(default)]
        is_first: Option<bool>,
        #[serde(default)]
        is_last: Option<bool>,
    },
    ToggleMute { video_id: String },
    TogglePlay { video_id: String },
    VideoVisibility { video_id: String, ratio: f64 },

    // shorts grid
    OpenShort { index: usize },
    CloseShort,

    // interactions
    ToggleLike { video_id: String },
    ToggleSave { video_id: String },
    AddComment { video_id: String, text: String },

    // shopping
    SelectOption { option: String, value: String },
    AddToCart,
    AddCatalogProduct { product_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "data")]
#[ts(export)]
pub enum ServerEvent {
    FeedLoaded {
        videos: Vec<FeedVideo>,
    },
    StoryChanged {
        story_index: usize,
        item_index: usize,
    },
    StoryPaused {
        paused: bool,
    },
    StoryClosed,
    VideoChanged {
        current: usize,
        fullscreen_index: Option<usize>,
        slide: Option<SlideDirection>,
    },
    PlaybackChanged {
        video_id: String,
        playback: Playback,
        embed_url: Option<String>,
    },
    ShortChanged {
        fullscreen_index: Option<usize>,
        embed_url: Option<String>,
    },
    InteractionChanged {
        video_id: String,
        liked: bool,
        saved: bool,
    },
    CommentAdded {
        video_id: String,
        comment: Comment,
    },
    OptionSelected {
        option: String,
        value: String,
    },
    CartUpdated {
        product_id: String,
        quantity: u32,
        cart_count: u32,
    },
    SnackbarShown {
        message: String,
    },
    SnackbarHidden,
}

/// What one feed card renders.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct VideoView {
    #[serde(flatten)]
    pub video: FeedVideo,
    pub liked: bool,
    pub saved: bool,
    pub comments: Vec<Comment>,
    pub playback: Playback,
}

/// Full render state of a session.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub loading: bool,
    pub videos: Vec<VideoView>,
    pub player: PlayerState,
    pub feed: FeedNavigator,
    pub shorts: FeedNavigator,
    pub cart_items: Vec<CartItem>,
    pub cart_count: u32,
    pub selected_options: BTreeMap<String, String>,
    pub snackbar: Option<String>,
}
