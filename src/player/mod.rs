pub mod feed;
pub mod gesture;
pub mod story;
pub mod timer;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use feed::{FeedNavigator, SlideDirection, SwipeGate};
pub use gesture::{Point, Swipe};
pub use story::{PlayerChange, PlayerEvent, PlayerState, StoryPlayer};
pub use timer::ProgressTimer;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PlayerError {
    #[error("Story index {index} is out of range ({count} stories)")]
    StoryOutOfRange { index: usize, count: usize },
    #[error("Story '{0}' has no items")]
    EmptyStory(String),
    #[error("Video index {index} is out of range ({count} videos)")]
    VideoOutOfRange { index: usize, count: usize },
}

/// How a tick turns into progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ProgressModel {
    /// Progress follows wall-clock time between ticks.
    #[default]
    Elapsed,
    /// Each tick adds `100 / (duration * 1000)` percent regardless of the tick
    /// period, which makes an item run ten times longer than its duration at
    /// a 10ms period. Kept so existing front ends can match their old timing.
    LegacyInterval,
}
