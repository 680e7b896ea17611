//! Embedded short-form video playback. The embed player has no control
//! channel here: every mute/play change rebuilds the iframe URL.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::Url;

pub const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Share of the card that must be on screen before it autoplays.
pub const AUTOPLAY_VISIBILITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmbedOptions {
    pub autoplay: bool,
    pub muted: bool,
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

pub fn embed_url(
    video_id: &str,
    options: EmbedOptions,
    origin: Option<&str>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(EMBED_BASE)?.join(video_id)?;
    url.query_pairs_mut()
        .append_pair("enablejsapi", "1")
        .append_pair("controls", "0")
        .append_pair("mute", flag(options.muted))
        .append_pair("autoplay", flag(options.autoplay))
        .append_pair("playsinline", "1")
        .append_pair("loop", "1")
        .append_pair("modestbranding", "1")
        .append_pair("rel", "0")
        .append_pair("playlist", video_id)
        .append_pair("origin", origin.unwrap_or_default());
    Ok(url)
}

/// Mute/play state of one video card. Cards start muted and stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Playback {
    pub muted: bool,
    pub playing: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            muted: true,
            playing: false,
        }
    }
}

impl Playback {
    pub fn options(&self) -> EmbedOptions {
        EmbedOptions {
            autoplay: self.playing,
            muted: self.muted,
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    /// Plays once the card is mostly on screen and stops otherwise.
    pub fn set_visibility(&mut self, ratio: f64) {
        self.playing = ratio >= AUTOPLAY_VISIBILITY;
    }
}
