pub mod error;
pub mod manager;
pub mod message;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::catalog::{Catalog, ProductDetails};
use crate::config::FeedConfig;
use crate::content::FeedVideo;
use crate::content::embed::{EmbedOptions, Playback, embed_url};
use crate::player::{
    FeedNavigator, PlayerChange, PlayerEvent, Point, ProgressModel, ProgressTimer, SlideDirection,
    StoryPlayer, SwipeGate,
};
use crate::store::{CartStore, InteractionStore};

pub use error::SessionError;
pub use manager::SessionManager;
pub use message::{ClientCommand, ServerEvent, SessionSnapshot, VideoView};

pub type SessionId = Uuid;

pub const ADDED_TO_CART: &str = "Added to cart";

/// Knobs a session copies out of [`FeedConfig`] at creation.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub channel_capacity: usize,
    pub tick_interval: Duration,
    pub swipe_threshold: f64,
    pub progress_model: ProgressModel,
    pub snackbar_duration: Duration,
    pub embed_origin: Option<String>,
}

impl From<&FeedConfig> for SessionSettings {
    fn from(config: &FeedConfig) -> Self {
        Self {
            channel_capacity: config.session.channel_capacity,
            tick_interval: config.player.tick_interval(),
            swipe_threshold: config.player.swipe_threshold,
            progress_model: config.player.progress_model,
            snackbar_duration: config.session.snackbar_duration(),
            embed_origin: config.feed.embed_origin.clone(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

#[derive(Debug)]
struct SessionState {
    loading: bool,
    videos: Vec<FeedVideo>,
    interactions: InteractionStore,
    cart: CartStore,
    player: StoryPlayer,
    feed: FeedNavigator,
    shorts: FeedNavigator,
    playback: HashMap<String, Playback>,
    selected_options: BTreeMap<String, String>,
    snackbar: Option<String>,
    progress_timer: Option<ProgressTimer>,
    snackbar_timer: Option<JoinHandle<()>>,
    last_seen: Instant,
}

/// One viewer's feed: stores, navigators and the story player, all mutated
/// one command at a time under a single lock.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    catalog: Arc<Catalog>,
    settings: SessionSettings,
    sender: broadcast::Sender<ServerEvent>,
    state: Mutex<SessionState>,
}

fn default_selections(product: &ProductDetails) -> BTreeMap<String, String> {
    product
        .options
        .iter()
        .filter_map(|o| o.values.first().map(|v| (o.name.clone(), v.id.clone())))
        .collect()
}

impl Session {
    pub fn new(
        id: SessionId,
        catalog: Arc<Catalog>,
        settings: SessionSettings,
    ) -> Result<Arc<Self>, SessionError> {
        let player = StoryPlayer::new(catalog.stories.clone())?
            .with_progress_model(settings.progress_model)
            .with_swipe_threshold(settings.swipe_threshold);
        let (sender, _) = broadcast::channel(settings.channel_capacity.max(1));
        let state = SessionState {
            loading: true,
            videos: Vec::new(),
            interactions: InteractionStore::new(),
            cart: CartStore::new(),
            player,
            feed: FeedNavigator::new(0).with_swipe_threshold(settings.swipe_threshold),
            shorts: FeedNavigator::new(catalog.shorts.len())
                .with_swipe_threshold(settings.swipe_threshold),
            playback: HashMap::new(),
            selected_options: default_selections(&catalog.product),
            snackbar: None,
            progress_timer: None,
            snackbar_timer: None,
            last_seen: Instant::now(),
        };
        Ok(Arc::new(Self {
            id,
            catalog,
            settings,
            sender,
            state: Mutex::new(state),
        }))
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// A session with a connected subscriber is never idle, even without commands.
    pub async fn is_idle(&self, idle_timeout: Duration) -> bool {
        if self.sender.receiver_count() > 0 {
            return false;
        }
        self.state.lock().await.last_seen.elapsed() > idle_timeout
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    fn emit(&self, event: ServerEvent) {
        // no subscribers is normal for REST-only clients
        if self.sender.send(event).is_err() {
            tracing::trace!(session_id = %self.id, "No subscribers for session event");
        }
    }

    /// Installs the fetched feed and clears the loading flag.
    pub async fn finish_loading(&self, videos: Vec<FeedVideo>) {
        let mut state = self.state.lock().await;
        state.feed =
            FeedNavigator::new(videos.len()).with_swipe_threshold(self.settings.swipe_threshold);
        state.videos = videos.clone();
        state.loading = false;
        tracing::info!(session_id = %self.id, video_count = videos.len(), "Feed ready");
        self.emit(ServerEvent::FeedLoaded { videos });
    }

    /// Aborts the session's timers.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        state.progress_timer = None;
        if let Some(handle) = state.snackbar_timer.take() {
            handle.abort();
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let mut state = self.state.lock().await;
        state.last_seen = Instant::now();
        let videos = state
            .videos
            .iter()
            .map(|video| VideoView {
                video: video.clone(),
                liked: state.interactions.is_liked(&video.id),
                saved: state.interactions.is_saved(&video.id),
                comments: state.interactions.comments(&video.id).to_vec(),
                playback: state.playback.get(&video.id).copied().unwrap_or_default(),
            })
            .collect();

        SessionSnapshot {
            session_id: self.id,
            loading: state.loading,
            videos,
            player: state.player.state(),
            feed: state.feed.clone(),
            shorts: state.shorts.clone(),
            cart_items: state.cart.items().to_vec(),
            cart_count: state.cart.cart_count(),
            selected_options: state.selected_options.clone(),
            snackbar: state.snackbar.clone(),
        }
    }

    pub async fn handle_command(self: &Arc<Self>, command: ClientCommand) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state.last_seen = Instant::now();

        match command {
            ClientCommand::OpenStory { index } => self.drive_player(&mut state, PlayerEvent::Open(index))?,
            ClientCommand::CloseStory => self.drive_player(&mut state, PlayerEvent::Close)?,
            ClientCommand::NextStoryItem => self.drive_player(&mut state, PlayerEvent::Advance)?,
            ClientCommand::PreviousStoryItem => self.drive_player(&mut state, PlayerEvent::Retreat)?,
            ClientCommand::ToggleStoryPause => {
                self.drive_player(&mut state, PlayerEvent::TogglePause)?
            }
            ClientCommand::StoryTouchStart { x, y } => {
                self.drive_player(&mut state, PlayerEvent::TouchStart(Point::new(x, y)))?
            }
            ClientCommand::StoryTouchMove { x, y } => {
                self.drive_player(&mut state, PlayerEvent::TouchMove(Point::new(x, y)))?
            }
            ClientCommand::StoryTouchEnd => self.drive_player(&mut state, PlayerEvent::TouchEnd)?,
            ClientCommand::StoryMediaDuration { seconds } => {
                self.drive_player(&mut state, PlayerEvent::MediaDuration(seconds))?
            }

            ClientCommand::OpenVideo { index } => {
                state.feed.open_fullscreen(index)?;
                self.emit_video(&state, None);
            }
            ClientCommand::CloseVideo => {
                if state.feed.close_fullscreen() {
                    self.emit_video(&state, None);
                }
            }
            ClientCommand::NextVideo => {
                if state.feed.next() {
                    self.emit_video(&state, None);
                }
            }
            ClientCommand::PreviousVideo => {
                if state.feed.previous() {
                    self.emit_video(&state, None);
                }
            }
            ClientCommand::SwipeVideo {
                delta_y,
                is_first,
                is_last,
            } => {
                let derived = state.feed.gate();
                let gate = SwipeGate {
                    is_first: is_first.unwrap_or(derived.is_first),
                    is_last: is_last.unwrap_or(derived.is_last),
                };
                if let Some(slide) = state.feed.swipe(delta_y, gate) {
                    self.emit_video(&state, Some(slide));
                }
            }
            ClientCommand::ToggleMute { video_id } => {
                let playback = state.playback.entry(video_id.clone()).or_default();
                playback.toggle_mute();
                let playback = *playback;
                self.emit_playback(video_id, playback);
            }
            ClientCommand::TogglePlay { video_id } => {
                let playback = state.playback.entry(video_id.clone()).or_default();
                playback.toggle_play();
                let playback = *playback;
                self.emit_playback(video_id, playback);
            }
            ClientCommand::VideoVisibility { video_id, ratio } => {
                let playback = state.playback.entry(video_id.clone()).or_default();
                let before = *playback;
                playback.set_visibility(ratio);
                let playback = *playback;
                if playback != before {
                    self.emit_playback(video_id, playback);
                }
            }

            ClientCommand::OpenShort { index } => {
                state.shorts.open_fullscreen(index)?;
                let embed = self.catalog.shorts.get(index).and_then(|short| {
                    self.embed(&short.video_id, EmbedOptions { autoplay: true, muted: false })
                });
                self.emit(ServerEvent::ShortChanged {
                    fullscreen_index: Some(index),
                    embed_url: embed,
                });
            }
            ClientCommand::CloseShort => {
                if state.shorts.close_fullscreen() {
                    self.emit(ServerEvent::ShortChanged {
                        fullscreen_index: None,
                        embed_url: None,
                    });
                }
            }

            ClientCommand::ToggleLike { video_id } => {
                state.interactions.toggle_like(&video_id);
                self.emit_interaction(&state, video_id);
            }
            ClientCommand::ToggleSave { video_id } => {
                state.interactions.toggle_save(&video_id);
                self.emit_interaction(&state, video_id);
            }
            ClientCommand::AddComment { video_id, text } => {
                if text.trim().is_empty() {
                    return Err(SessionError::EmptyComment);
                }
                let comment = state.interactions.add_comment(&video_id, text);
                tracing::debug!(session_id = %self.id, %video_id, comment_id = %comment.id, "Comment added");
                self.emit(ServerEvent::CommentAdded { video_id, comment });
            }

            ClientCommand::SelectOption { option, value } => {
                let Some(choice) = self
                    .catalog
                    .product
                    .option(&option)
                    .and_then(|o| o.value(&value))
                else {
                    return Err(SessionError::UnknownOption(option, value));
                };
                if choice.available {
                    state.selected_options.insert(option.clone(), value.clone());
                    self.emit(ServerEvent::OptionSelected { option, value });
                } else {
                    tracing::debug!(session_id = %self.id, %option, %value, "Ignoring unavailable option");
                }
            }
            ClientCommand::AddToCart => {
                let product = self.catalog.product.clone();
                self.add_to_cart(&mut state, product);
            }
            ClientCommand::AddCatalogProduct { product_id } => {
                let product = self
                    .catalog
                    .catalog_product(&product_id)
                    .map(ProductDetails::from)
                    .ok_or_else(|| SessionError::UnknownProduct(product_id.clone()))?;
                self.add_to_cart(&mut state, product);
            }
        }
        Ok(())
    }

    // --- story player ---

    fn drive_player(
        self: &Arc<Self>,
        state: &mut SessionState,
        event: PlayerEvent,
    ) -> Result<(), SessionError> {
        let change = state.player.on_event(event)?;
        self.emit_player_change(change);
        self.sync_timer(state);
        Ok(())
    }

    fn emit_player_change(&self, change: PlayerChange) {
        match change {
            PlayerChange::Moved {
                story_index,
                item_index,
            } => self.emit(ServerEvent::StoryChanged {
                story_index,
                item_index,
            }),
            PlayerChange::Paused(paused) => self.emit(ServerEvent::StoryPaused { paused }),
            PlayerChange::Closed => self.emit(ServerEvent::StoryClosed),
            PlayerChange::Progress(_) | PlayerChange::None => {}
        }
    }

    /// Keeps exactly one progress timer alive for the current cursor, and none
    /// once the player is closed.
    fn sync_timer(self: &Arc<Self>, state: &mut SessionState) {
        if !state.player.is_playing() {
            state.progress_timer = None;
            return;
        }
        let generation = state.player.generation();
        if state
            .progress_timer
            .as_ref()
            .is_some_and(|t| t.generation() == generation && !t.is_finished())
        {
            return;
        }

        let session = Arc::downgrade(self);
        tracing::trace!(session_id = %self.id, generation, "Starting progress timer");
        state.progress_timer = Some(ProgressTimer::spawn(
            generation,
            self.settings.tick_interval,
            move |generation, elapsed| {
                let session: Weak<Session> = session.clone();
                async move {
                    match session.upgrade() {
                        Some(session) => session.on_tick(generation, elapsed).await,
                        None => false,
                    }
                }
            },
        ));
    }

    async fn on_tick(self: Arc<Self>, generation: u64, elapsed: Duration) -> bool {
        let mut state = self.state.lock().await;
        if state.player.generation() != generation {
            return false;
        }
        match state.player.on_event(PlayerEvent::Tick(elapsed)) {
            Ok(change) => self.emit_player_change(change),
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Progress tick rejected");
                return false;
            }
        }
        let still_current = state.player.is_playing() && state.player.generation() == generation;
        if !still_current {
            self.sync_timer(&mut state);
        }
        still_current
    }

    // --- feed ---

    fn emit_video(&self, state: &SessionState, slide: Option<SlideDirection>) {
        self.emit(ServerEvent::VideoChanged {
            current: state.feed.current(),
            fullscreen_index: state.feed.fullscreen_index(),
            slide,
        });
    }

    fn embed(&self, video_id: &str, options: EmbedOptions) -> Option<String> {
        match embed_url(video_id, options, self.settings.embed_origin.as_deref()) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::warn!(session_id = %self.id, %video_id, error = %e, "Failed to build embed URL");
                None
            }
        }
    }

    fn emit_playback(&self, video_id: String, playback: Playback) {
        let embed_url = self
            .catalog
            .short(&video_id)
            .and_then(|short| self.embed(&short.video_id, playback.options()));
        self.emit(ServerEvent::PlaybackChanged {
            video_id,
            playback,
            embed_url,
        });
    }

    fn emit_interaction(&self, state: &SessionState, video_id: String) {
        let liked = state.interactions.is_liked(&video_id);
        let saved = state.interactions.is_saved(&video_id);
        self.emit(ServerEvent::InteractionChanged {
            video_id,
            liked,
            saved,
        });
    }

    // --- cart ---

    fn add_to_cart(self: &Arc<Self>, state: &mut SessionState, product: ProductDetails) {
        let product_id = product.id.clone();
        let quantity = state.cart.add_to_cart(product);
        let cart_count = state.cart.cart_count();
        tracing::info!(session_id = %self.id, %product_id, quantity, cart_count, "Added to cart");
        self.emit(ServerEvent::CartUpdated {
            product_id,
            quantity,
            cart_count,
        });
        self.show_snackbar(state, ADDED_TO_CART);
    }

    fn show_snackbar(self: &Arc<Self>, state: &mut SessionState, message: &str) {
        if let Some(handle) = state.snackbar_timer.take() {
            handle.abort();
        }
        state.snackbar = Some(message.to_string());
        self.emit(ServerEvent::SnackbarShown {
            message: message.to_string(),
        });

        let session = Arc::downgrade(self);
        let hide_after = self.settings.snackbar_duration;
        state.snackbar_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;
            if let Some(session) = session.upgrade() {
                session.hide_snackbar().await;
            }
        }));
    }

    async fn hide_snackbar(&self) {
        let mut state = self.state.lock().await;
        state.snackbar_timer = None;
        if state.snackbar.take().is_some() {
            self.emit(ServerEvent::SnackbarHidden);
        }
    }
}
