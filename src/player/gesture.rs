use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Minimum displacement, in screen units, for a touch to count as a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Default)]
#[ts(export)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Direction the finger travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Swipe {
    Left,
    Right,
    Up,
    Down,
}

/// Classifies a displacement measured as `start - end`, so a positive `dx` is a
/// leftward swipe and a positive `dy` an upward one.
///
/// The dominant axis wins; ties go to the vertical axis. The dominant
/// displacement must exceed `threshold` or nothing happens.
pub fn classify(dx: f64, dy: f64, threshold: f64) -> Option<Swipe> {
    if dx.abs() > dy.abs() {
        if dx.abs() <= threshold {
            return None;
        }
        Some(if dx > 0.0 { Swipe::Left } else { Swipe::Right })
    } else {
        classify_vertical(dy, threshold)
    }
}

pub fn classify_vertical(dy: f64, threshold: f64) -> Option<Swipe> {
    if dy.abs() <= threshold {
        return None;
    }
    Some(if dy > 0.0 { Swipe::Up } else { Swipe::Down })
}

/// Start and latest position of one touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchTrack {
    start: Point,
    end: Point,
}

impl TouchTrack {
    pub fn begin(at: Point) -> Self {
        Self { start: at, end: at }
    }

    pub fn move_to(&mut self, at: Point) {
        self.end = at;
    }

    pub fn classify(&self, threshold: f64) -> Option<Swipe> {
        classify(
            self.start.x - self.end.x,
            self.start.y - self.end.y,
            threshold,
        )
    }
}
