//! Layered configuration: compiled defaults, then `shoppable_feed.toml`, then
//! `SHOPPABLE_FEED_*` environment variables (`__` separates sections, e.g.
//! `SHOPPABLE_FEED_SERVER__PORT=9000`).

use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::player::ProgressModel;
use crate::player::gesture::MIN_SWIPE_DISTANCE;

pub const CONFIG_FILE: &str = "shoppable_feed.toml";
pub const ENV_PREFIX: &str = "SHOPPABLE_FEED_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub feed: FeedSection,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub tick_interval_ms: u64,
    pub swipe_threshold: f64,
    pub progress_model: ProgressModel,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            swipe_threshold: MIN_SWIPE_DISTANCE,
            progress_model: ProgressModel::Elapsed,
        }
    }
}

impl PlayerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedSection {
    /// Simulated latency of the mock content provider.
    pub mock_delay_ms: u64,
    /// Origin passed to embedded players.
    pub embed_origin: Option<String>,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            mock_delay_ms: 1000,
            embed_origin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    pub channel_capacity: usize,
    pub idle_timeout_secs: u64,
    pub cleanup_interval_secs: u64,
    pub snackbar_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 100,
            idle_timeout_secs: 30 * 60,
            cleanup_interval_secs: 30,
            snackbar_ms: 3000,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }

    pub fn snackbar_duration(&self) -> Duration {
        Duration::from_millis(self.snackbar_ms)
    }
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

pub fn load_config() -> Result<FeedConfig, figment::Error> {
    load_config_from_path(Path::new(CONFIG_FILE))
}

pub fn load_config_from_path(path: &Path) -> Result<FeedConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FeedConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

pub fn load_config_from_str(toml_content: &str) -> Result<FeedConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FeedConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}
