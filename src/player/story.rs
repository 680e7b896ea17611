use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::gesture::{MIN_SWIPE_DISTANCE, Point, Swipe, TouchTrack};
use super::{PlayerError, ProgressModel};
use crate::catalog::{MediaKind, Story, StoryItem};

// --- FSM Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "state")]
#[ts(export)]
pub enum PlayerState {
    Closed,
    Playing {
        story_index: usize,
        item_index: usize,
        /// Percent of the current item shown, 0..=100.
        progress: f64,
        paused: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    Open(usize),
    Close,
    Tick(Duration),
    /// Intrinsic length of the current video item, reported once loaded.
    MediaDuration(f64),
    Advance,
    Retreat,
    NextStory,
    PreviousStory,
    TogglePause,
    TouchStart(Point),
    TouchMove(Point),
    TouchEnd,
}

/// What an event did to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerChange {
    None,
    Progress(f64),
    Paused(bool),
    Moved {
        story_index: usize,
        item_index: usize,
    },
    Closed,
}

// --- FSM Implementation ---

/// Story viewer state machine over an immutable list of stories.
///
/// While playing, exactly one `(story_index, item_index)` is current and always
/// indexes an existing item. Every cursor change resets progress and bumps
/// [`StoryPlayer::generation`], which keys the progress timer.
#[derive(Debug, Clone)]
pub struct StoryPlayer {
    stories: Arc<[Story]>,
    state: PlayerState,
    generation: u64,
    touch: Option<TouchTrack>,
    media_duration: Option<f64>,
    model: ProgressModel,
    swipe_threshold: f64,
}

impl StoryPlayer {
    pub fn new(stories: impl Into<Arc<[Story]>>) -> Result<Self, PlayerError> {
        let stories = stories.into();
        if let Some(empty) = stories.iter().find(|s| s.items.is_empty()) {
            return Err(PlayerError::EmptyStory(empty.id.clone()));
        }
        Ok(Self {
            stories,
            state: PlayerState::Closed,
            generation: 0,
            touch: None,
            media_duration: None,
            model: ProgressModel::default(),
            swipe_threshold: MIN_SWIPE_DISTANCE,
        })
    }

    pub fn with_progress_model(mut self, model: ProgressModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayerState::Playing { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, PlayerState::Playing { paused: true, .. })
    }

    pub fn cursor(&self) -> Option<(usize, usize)> {
        match self.state {
            PlayerState::Playing {
                story_index,
                item_index,
                ..
            } => Some((story_index, item_index)),
            PlayerState::Closed => None,
        }
    }

    pub fn current_item(&self) -> Option<&StoryItem> {
        let (story, item) = self.cursor()?;
        self.stories.get(story)?.items.get(item)
    }

    pub fn on_event(&mut self, event: PlayerEvent) -> Result<PlayerChange, PlayerError> {
        let change = match (self.state, event) {
            (_, PlayerEvent::Open(index)) => {
                if index >= self.stories.len() {
                    return Err(PlayerError::StoryOutOfRange {
                        index,
                        count: self.stories.len(),
                    });
                }
                self.move_to(index, 0)
            }

            (PlayerState::Closed, _) => PlayerChange::None,

            (_, PlayerEvent::Close) => self.close(),
            (_, PlayerEvent::Tick(elapsed)) => self.tick(elapsed),
            (_, PlayerEvent::MediaDuration(seconds)) => {
                if self.current_item().map(|i| i.kind) == Some(MediaKind::Video)
                    && seconds.is_finite()
                    && seconds > 0.0
                {
                    self.media_duration = Some(seconds);
                }
                PlayerChange::None
            }
            (_, PlayerEvent::Advance) => self.advance(),
            (_, PlayerEvent::Retreat) => self.retreat(),
            (_, PlayerEvent::NextStory) => self.next_story(),
            (_, PlayerEvent::PreviousStory) => self.previous_story(),
            (PlayerState::Playing { paused, .. }, PlayerEvent::TogglePause) => {
                self.set_paused(!paused)
            }
            (_, PlayerEvent::TouchStart(at)) => {
                self.touch = Some(TouchTrack::begin(at));
                self.set_paused(true)
            }
            (_, PlayerEvent::TouchMove(at)) => {
                if let Some(track) = self.touch.as_mut() {
                    track.move_to(at);
                }
                PlayerChange::None
            }
            (_, PlayerEvent::TouchEnd) => self.release(),
        };
        Ok(change)
    }

    fn release(&mut self) -> PlayerChange {
        let swipe = self
            .touch
            .take()
            .and_then(|track| track.classify(self.swipe_threshold));
        let change = match swipe {
            Some(Swipe::Left) => self.next_story(),
            Some(Swipe::Right) => self.previous_story(),
            Some(Swipe::Up) => self.advance(),
            Some(Swipe::Down) => self.retreat(),
            None => PlayerChange::None,
        };
        let resumed = self.set_paused(false);
        match change {
            PlayerChange::None => resumed,
            moved => moved,
        }
    }

    fn tick(&mut self, elapsed: Duration) -> PlayerChange {
        let Some(duration) = self.current_duration() else {
            return PlayerChange::None;
        };
        let PlayerState::Playing {
            progress, paused, ..
        } = &mut self.state
        else {
            return PlayerChange::None;
        };
        if *paused {
            return PlayerChange::None;
        }

        let step = if duration <= 0.0 {
            100.0
        } else {
            match self.model {
                ProgressModel::Elapsed => elapsed.as_secs_f64() / duration * 100.0,
                ProgressModel::LegacyInterval => 100.0 / (duration * 1000.0),
            }
        };
        let next = *progress + step;
        if next >= 100.0 {
            return self.advance();
        }
        *progress = next;
        PlayerChange::Progress(next)
    }

    fn current_duration(&self) -> Option<f64> {
        let item = self.current_item()?;
        Some(match (item.kind, self.media_duration) {
            (MediaKind::Video, Some(seconds)) => seconds,
            _ => item.duration_seconds,
        })
    }

    fn advance(&mut self) -> PlayerChange {
        let Some((story, item)) = self.cursor() else {
            return PlayerChange::None;
        };
        if item + 1 < self.stories[story].items.len() {
            self.move_to(story, item + 1)
        } else if story + 1 < self.stories.len() {
            self.move_to(story + 1, 0)
        } else {
            self.close()
        }
    }

    fn retreat(&mut self) -> PlayerChange {
        let Some((story, item)) = self.cursor() else {
            return PlayerChange::None;
        };
        if item > 0 {
            self.move_to(story, item - 1)
        } else if story > 0 {
            let last = self.stories[story - 1].items.len() - 1;
            self.move_to(story - 1, last)
        } else {
            PlayerChange::None
        }
    }

    fn next_story(&mut self) -> PlayerChange {
        let Some((story, _)) = self.cursor() else {
            return PlayerChange::None;
        };
        if story + 1 < self.stories.len() {
            self.move_to(story + 1, 0)
        } else {
            self.close()
        }
    }

    fn previous_story(&mut self) -> PlayerChange {
        match self.cursor() {
            Some((story, _)) if story > 0 => self.move_to(story - 1, 0),
            _ => PlayerChange::None,
        }
    }

    fn move_to(&mut self, story_index: usize, item_index: usize) -> PlayerChange {
        self.state = PlayerState::Playing {
            story_index,
            item_index,
            progress: 0.0,
            paused: false,
        };
        self.generation += 1;
        self.media_duration = None;
        PlayerChange::Moved {
            story_index,
            item_index,
        }
    }

    fn close(&mut self) -> PlayerChange {
        self.state = PlayerState::Closed;
        self.generation += 1;
        self.touch = None;
        self.media_duration = None;
        PlayerChange::Closed
    }

    fn set_paused(&mut self, value: bool) -> PlayerChange {
        match &mut self.state {
            PlayerState::Playing { paused, .. } if *paused != value => {
                *paused = value;
                PlayerChange::Paused(value)
            }
            _ => PlayerChange::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock;

    fn player() -> StoryPlayer {
        StoryPlayer::new(mock::stories()).unwrap()
    }

    fn swipe(player: &mut StoryPlayer, from: Point, to: Point) -> PlayerChange {
        player.on_event(PlayerEvent::TouchStart(from)).unwrap();
        player.on_event(PlayerEvent::TouchMove(to)).unwrap();
        player.on_event(PlayerEvent::TouchEnd).unwrap()
    }

    #[test]
    fn open_starts_at_first_item() {
        let mut player = player();
        assert_eq!(player.state(), PlayerState::Closed);
        player.on_event(PlayerEvent::Open(1)).unwrap();
        assert_eq!(
            player.state(),
            PlayerState::Playing {
                story_index: 1,
                item_index: 0,
                progress: 0.0,
                paused: false
            }
        );
    }

    #[test]
    fn open_out_of_range_is_rejected() {
        let mut player = player();
        let err = player.on_event(PlayerEvent::Open(6)).unwrap_err();
        assert_eq!(err, PlayerError::StoryOutOfRange { index: 6, count: 6 });
        assert_eq!(player.state(), PlayerState::Closed);
    }

    #[test]
    fn empty_story_is_rejected() {
        let mut stories = mock::stories();
        stories[3].items.clear();
        let err = StoryPlayer::new(stories).unwrap_err();
        assert_eq!(err, PlayerError::EmptyStory("4".to_string()));
    }

    #[test]
    fn advancing_from_story_two_runs_out_and_closes() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(2)).unwrap();
        let mut steps = 0;
        while player.is_playing() {
            player.on_event(PlayerEvent::Advance).unwrap();
            steps += 1;
            assert!(steps <= 10, "player never closed");
        }
        // stories 3..=6 have one item each
        assert_eq!(steps, 4);
        assert_eq!(player.state(), PlayerState::Closed);
    }

    #[test]
    fn advance_walks_items_before_stories() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        assert_eq!(
            player.on_event(PlayerEvent::Advance).unwrap(),
            PlayerChange::Moved { story_index: 0, item_index: 1 }
        );
        assert_eq!(
            player.on_event(PlayerEvent::Advance).unwrap(),
            PlayerChange::Moved { story_index: 1, item_index: 0 }
        );
    }

    #[test]
    fn retreat_at_origin_is_a_no_op() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        let generation = player.generation();
        assert_eq!(player.on_event(PlayerEvent::Retreat).unwrap(), PlayerChange::None);
        assert_eq!(player.cursor(), Some((0, 0)));
        assert_eq!(player.generation(), generation);
    }

    #[test]
    fn retreat_lands_on_previous_story_last_item() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(1)).unwrap();
        player.on_event(PlayerEvent::Retreat).unwrap();
        assert_eq!(player.cursor(), Some((0, 1)));
    }

    #[test]
    fn ticks_fill_progress_then_advance() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        let change = player
            .on_event(PlayerEvent::Tick(Duration::from_millis(2500)))
            .unwrap();
        assert_eq!(change, PlayerChange::Progress(50.0));

        let change = player
            .on_event(PlayerEvent::Tick(Duration::from_millis(2500)))
            .unwrap();
        assert_eq!(change, PlayerChange::Moved { story_index: 0, item_index: 1 });
        assert!(matches!(player.state(), PlayerState::Playing { progress, .. } if progress == 0.0));
    }

    #[test]
    fn paused_player_ignores_ticks() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        assert_eq!(
            player.on_event(PlayerEvent::TogglePause).unwrap(),
            PlayerChange::Paused(true)
        );
        let change = player
            .on_event(PlayerEvent::Tick(Duration::from_secs(10)))
            .unwrap();
        assert_eq!(change, PlayerChange::None);
        assert_eq!(player.cursor(), Some((0, 0)));
        assert_eq!(
            player.on_event(PlayerEvent::TogglePause).unwrap(),
            PlayerChange::Paused(false)
        );
    }

    #[test]
    fn legacy_model_adds_fixed_step_per_tick() {
        let mut player = player().with_progress_model(ProgressModel::LegacyInterval);
        player.on_event(PlayerEvent::Open(0)).unwrap();
        let change = player
            .on_event(PlayerEvent::Tick(Duration::from_millis(10)))
            .unwrap();
        // 100 / (5 * 1000)
        assert_eq!(change, PlayerChange::Progress(0.02));
    }

    #[test]
    fn video_items_use_reported_media_duration() {
        let mut stories = mock::stories();
        stories[0].items[0].kind = MediaKind::Video;
        let mut player = StoryPlayer::new(stories).unwrap();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        player.on_event(PlayerEvent::MediaDuration(20.0)).unwrap();
        let change = player
            .on_event(PlayerEvent::Tick(Duration::from_secs(5)))
            .unwrap();
        assert_eq!(change, PlayerChange::Progress(25.0));
    }

    #[test]
    fn short_swipe_changes_nothing() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(2)).unwrap();
        let generation = player.generation();
        swipe(&mut player, Point::new(200.0, 300.0), Point::new(170.0, 300.0));
        swipe(&mut player, Point::new(200.0, 300.0), Point::new(200.0, 270.0));
        assert_eq!(player.cursor(), Some((2, 0)));
        assert_eq!(player.generation(), generation);
        assert!(!player.is_paused());
    }

    #[test]
    fn touch_down_pauses_until_release() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        player
            .on_event(PlayerEvent::TouchStart(Point::new(10.0, 10.0)))
            .unwrap();
        assert!(player.is_paused());
        player.on_event(PlayerEvent::TouchEnd).unwrap();
        assert!(!player.is_paused());
    }

    #[test]
    fn horizontal_swipes_change_story() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        player.on_event(PlayerEvent::Advance).unwrap();

        let change = swipe(&mut player, Point::new(300.0, 400.0), Point::new(100.0, 400.0));
        assert_eq!(change, PlayerChange::Moved { story_index: 1, item_index: 0 });

        // previous story lands on its first item, not its last
        let change = swipe(&mut player, Point::new(100.0, 400.0), Point::new(300.0, 400.0));
        assert_eq!(change, PlayerChange::Moved { story_index: 0, item_index: 0 });
    }

    #[test]
    fn swiping_past_last_story_closes() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(5)).unwrap();
        let change = swipe(&mut player, Point::new(300.0, 400.0), Point::new(100.0, 400.0));
        assert_eq!(change, PlayerChange::Closed);
        assert_eq!(player.state(), PlayerState::Closed);
    }

    #[test]
    fn vertical_swipes_step_items() {
        let mut player = player();
        player.on_event(PlayerEvent::Open(0)).unwrap();
        swipe(&mut player, Point::new(200.0, 500.0), Point::new(200.0, 300.0));
        assert_eq!(player.cursor(), Some((0, 1)));
        swipe(&mut player, Point::new(200.0, 300.0), Point::new(200.0, 500.0));
        assert_eq!(player.cursor(), Some((0, 0)));
    }

    #[test]
    fn closed_player_ignores_navigation() {
        let mut player = player();
        assert_eq!(player.on_event(PlayerEvent::Advance).unwrap(), PlayerChange::None);
        assert_eq!(
            player.on_event(PlayerEvent::Tick(Duration::from_secs(1))).unwrap(),
            PlayerChange::None
        );
    }
}
