use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::PlayerError;
use super::gesture::{MIN_SWIPE_DISTANCE, Swipe, classify_vertical};

/// Which way the fullscreen video slides in after a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SlideDirection {
    Up,
    Down,
}

/// Edge flags the card that received the swipe knows about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwipeGate {
    pub is_first: bool,
    pub is_last: bool,
}

/// Cursor over a fixed-length list of videos, plus the fullscreen overlay.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct FeedNavigator {
    len: usize,
    current: usize,
    fullscreen: bool,
    last_opened: Option<usize>,
    #[serde(skip)]
    #[ts(skip)]
    swipe_threshold: f64,
}

impl FeedNavigator {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current: 0,
            fullscreen: false,
            last_opened: None,
            swipe_threshold: MIN_SWIPE_DISTANCE,
        }
    }

    pub fn with_swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Index of the card currently shown fullscreen, if any.
    pub fn fullscreen_index(&self) -> Option<usize> {
        self.last_opened.filter(|_| self.fullscreen)
    }

    /// Edge flags derived from the cursor itself.
    pub fn gate(&self) -> SwipeGate {
        SwipeGate {
            is_first: self.current == 0,
            is_last: self.current + 1 >= self.len,
        }
    }

    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.len {
            return false;
        }
        self.current += 1;
        self.last_opened = Some(self.current);
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.last_opened = Some(self.current);
        true
    }

    pub fn open_fullscreen(&mut self, index: usize) -> Result<(), PlayerError> {
        if index >= self.len {
            return Err(PlayerError::VideoOutOfRange {
                index,
                count: self.len,
            });
        }
        self.fullscreen = true;
        self.current = index;
        self.last_opened = Some(index);
        Ok(())
    }

    /// Leaves fullscreen; the cursor stays where the viewer left it.
    /// Returns `false` when nothing was open.
    pub fn close_fullscreen(&mut self) -> bool {
        let was_open = self.fullscreen;
        self.fullscreen = false;
        self.last_opened = None;
        was_open
    }

    /// Handles a vertical swipe with displacement `start_y - end_y`.
    ///
    /// Only acts while fullscreen. An upward swipe moves to the next video unless
    /// `gate.is_last`; a downward swipe moves back unless `gate.is_first`.
    pub fn swipe(&mut self, delta_y: f64, gate: SwipeGate) -> Option<SlideDirection> {
        if !self.fullscreen {
            return None;
        }
        match classify_vertical(delta_y, self.swipe_threshold)? {
            Swipe::Up if !gate.is_last => self.next().then_some(SlideDirection::Up),
            Swipe::Down if !gate.is_first => self.previous().then_some(SlideDirection::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_previous_clamp_at_edges() {
        let mut nav = FeedNavigator::new(3);
        assert!(!nav.previous());
        assert!(nav.next());
        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.current(), 2);
        assert!(nav.previous());
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn opening_fullscreen_moves_cursor_and_remembers_index() {
        let mut nav = FeedNavigator::new(3);
        nav.open_fullscreen(2).unwrap();
        assert_eq!(nav.current(), 2);
        assert_eq!(nav.fullscreen_index(), Some(2));

        assert!(nav.close_fullscreen());
        assert!(!nav.is_fullscreen());
        assert_eq!(nav.fullscreen_index(), None);
        assert_eq!(nav.current(), 2);
        assert!(!nav.close_fullscreen());
    }

    #[test]
    fn opening_out_of_range_fails() {
        let mut nav = FeedNavigator::new(2);
        assert_eq!(
            nav.open_fullscreen(2),
            Err(PlayerError::VideoOutOfRange { index: 2, count: 2 })
        );
        assert!(!nav.is_fullscreen());
    }

    #[test]
    fn short_swipe_changes_nothing() {
        let mut nav = FeedNavigator::new(3);
        nav.open_fullscreen(1).unwrap();
        assert_eq!(nav.swipe(30.0, nav.gate()), None);
        assert_eq!(nav.swipe(-30.0, nav.gate()), None);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn swipes_follow_sign_and_gate() {
        let mut nav = FeedNavigator::new(3);
        nav.open_fullscreen(1).unwrap();
        assert_eq!(nav.swipe(120.0, nav.gate()), Some(SlideDirection::Up));
        assert_eq!(nav.fullscreen_index(), Some(2));
        assert_eq!(nav.swipe(120.0, nav.gate()), None);
        assert_eq!(nav.swipe(-120.0, nav.gate()), Some(SlideDirection::Down));
        assert_eq!(nav.current(), 1);

        let blocked = SwipeGate { is_first: true, is_last: true };
        assert_eq!(nav.swipe(120.0, blocked), None);
        assert_eq!(nav.swipe(-120.0, blocked), None);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn swipes_outside_fullscreen_are_ignored() {
        let mut nav = FeedNavigator::new(3);
        assert_eq!(nav.swipe(120.0, nav.gate()), None);
        assert_eq!(nav.current(), 0);
    }
}
