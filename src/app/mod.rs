pub mod actions;
pub mod events;
pub mod state;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::input;
use crate::lyrics::{LyricsOvhClient, Resolver, SongIdentity};
use crate::player::clock::SimulatedClock;
use crate::player::mpv::MpvHandle;
use crate::player::Backend;
use crate::playlist::{Playlist, Song};
use crate::storage::LyricsCache;
use crate::sync::LyricsView;
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, LyricsEvent, PlayerEvent};
use state::{AppState, Toast};
use tokio::sync::mpsc;

/// Redraw interval while the lyrics pane is scrolling
const FRAME: Duration = Duration::from_millis(33);
const SEEK_STEP_SECS: f64 = 5.0;
const VOLUME_STEP: u8 = 5;
const CLOCK_TICK: Duration = Duration::from_millis(100);

/// Resolver wired from config: remote client and cache only when enabled.
pub fn build_resolver(cfg: &Config) -> anyhow::Result<Resolver> {
    let mut resolver = Resolver::new(cfg.lyrics.resolver_settings());
    if cfg.lyrics.remote {
        let client = LyricsOvhClient::new(&cfg.lyrics.base_url, cfg.lyrics.timeout())?;
        resolver = resolver.with_remote(Arc::new(client));
    }
    if cfg.lyrics.cache {
        resolver = resolver.with_cache(LyricsCache::new(cfg.cache_path()));
    }
    Ok(resolver)
}

pub struct App {
    cfg: Config,
    config_path: std::path::PathBuf,
    state: AppState,
    resolver: Arc<Resolver>,
    backend: Option<Backend>,
}

impl App {
    pub fn new(cfg: Config, config_path: std::path::PathBuf, songs: Vec<Song>) -> anyhow::Result<Self> {
        let resolver = Arc::new(build_resolver(&cfg)?);
        let view = LyricsView::new(
            cfg.sync.settings(),
            cfg.sync.scroll_duration(),
            cfg.sync.scroll_epsilon,
        );
        let state = AppState::new(Playlist::new(songs), view, cfg.player.volume.min(100));

        Ok(Self {
            cfg,
            config_path,
            state,
            resolver,
            backend: None,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone(), self.cfg.input.mouse);

        // mpv is best-effort; without it the lyrics still follow a silent clock.
        let mpv_log = self.cfg.paths.data_dir.join("mpv.log");
        let backend = match MpvHandle::spawn(
            tx.clone(),
            self.cfg.player.audio_device.as_deref(),
            Some(&mpv_log),
        )
        .await
        {
            Ok(h) => Backend::Mpv(h),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "mpv unavailable, using simulated clock");
                self.state.toast = Some(Toast::new("mpv not found: lyrics run on a silent clock"));
                Backend::Simulated {
                    clock: SimulatedClock::spawn(tx.clone(), CLOCK_TICK),
                    duration_secs: self.cfg.player.simulated_duration_secs,
                }
            }
        };
        let _ = backend.set_volume(self.state.volume).await;
        self.state.backend = backend.name();
        self.backend = Some(backend);

        tui::draw(terminal, &mut self.state)?;

        if !self.state.playlist.is_empty() {
            self.play_index(0, &tx).await;
            tui::draw(terminal, &mut self.state)?;
        }

        loop {
            let event = if self.state.lyrics.is_animating() {
                match tokio::time::timeout(FRAME, rx.recv()).await {
                    Ok(Some(ev)) => Some(ev),
                    Ok(None) => break,
                    // frame tick
                    Err(_) => None,
                }
            } else {
                match rx.recv().await {
                    Some(ev) => Some(ev),
                    None => break,
                }
            };

            match event {
                Some(Event::Input(input_ev)) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.handle_action(action, &tx).await;
                    }
                }
                Some(Event::Player(pe)) => self.handle_player(pe, &tx).await,
                Some(Event::Lyrics(le)) => self.handle_lyrics(le),
                None => {}
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        if let Some(backend) = &self.backend {
            let _ = backend.stop().await;
        }
        self.save_state_on_quit();

        Ok(())
    }

    fn save_state_on_quit(&mut self) {
        self.cfg.player.volume = self.state.volume;
        if let Err(e) = crate::config::save(&self.cfg, Some(&self.config_path)) {
            tracing::warn!(error = %format!("{e:#}"), "could not save config");
        }
    }

    async fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::ListUp => self.state.select_prev(),
            Action::ListDown => self.state.select_next(),
            Action::GoTop => self.state.select_first(),
            Action::GoBottom => self.state.select_last(),
            Action::PlaySelected => {
                if let Some(index) = self.state.selected_visible() {
                    self.play_index(index, tx).await;
                }
            }
            Action::RemoveSelected => {
                let Some(index) = self.state.selected_visible() else {
                    return;
                };
                let was_current = self.state.playlist.current_index() == Some(index);
                if self.state.playlist.remove(index).is_some() {
                    self.state.clamp_selection();
                    if was_current {
                        self.stop().await;
                    }
                }
            }
            Action::ToggleFavorite => {
                if let Some(index) = self.state.selected_visible()
                    && let Some(favorite) = self.state.playlist.toggle_favorite(index)
                {
                    let label = if favorite { "Added to favorites" } else { "Removed from favorites" };
                    self.state.toast = Some(Toast::new(label));
                    self.state.clamp_selection();
                }
            }
            Action::ToggleFavoritesOnly => {
                let label = if self.state.playlist.toggle_favorites_only() {
                    "Showing favorites"
                } else {
                    "Showing all songs"
                };
                self.state.toast = Some(Toast::new(label));
                self.state.clamp_selection();
            }
            Action::StartSearch => self.state.search_mode = true,
            Action::SearchInput(c) => self.state.push_search_char(c),
            Action::SearchBackspace => self.state.pop_search_char(),
            Action::ConfirmSearch => self.state.search_mode = false,
            Action::CancelSearch => self.state.clear_search(),
            Action::TogglePause => {
                if self.state.now_playing.is_none() {
                    if let Some(index) = self.state.selected_visible() {
                        self.play_index(index, tx).await;
                    }
                } else if let Some(backend) = &self.backend
                    && let Err(e) = backend.toggle_pause().await
                {
                    self.state.show_error("Playback Error", format!("{e:#}"));
                }
            }
            Action::Stop => self.stop().await,
            Action::PlayNext => {
                let moved = self.state.playlist.advance().is_some();
                match self.state.playlist.current_index().filter(|_| moved) {
                    Some(index) => self.play_index(index, tx).await,
                    None => self.stop().await,
                }
            }
            Action::PlayPrev => {
                let moved = self.state.playlist.go_back().is_some();
                if let Some(index) = self.state.playlist.current_index().filter(|_| moved) {
                    self.play_index(index, tx).await;
                }
            }
            Action::SeekForward => self.seek(SEEK_STEP_SECS).await,
            Action::SeekBack => self.seek(-SEEK_STEP_SECS).await,
            Action::VolumeUp => {
                self.state.volume = self.state.volume.saturating_add(VOLUME_STEP).min(100);
                self.apply_volume().await;
            }
            Action::VolumeDown => {
                self.state.volume = self.state.volume.saturating_sub(VOLUME_STEP);
                self.apply_volume().await;
            }
            Action::ToggleMute => {
                self.state.muted = !self.state.muted;
                if let Some(backend) = &self.backend {
                    let _ = backend.set_mute(self.state.muted).await;
                }
            }
            Action::CycleRepeat => {
                let mode = self.state.playlist.cycle_repeat();
                self.state.toast = Some(Toast::new(mode.label()));
            }
            Action::ToggleShuffle => {
                self.state.playlist.toggle_shuffle();
                let label = if self.state.playlist.is_shuffle_enabled() {
                    "Shuffle: On"
                } else {
                    "Shuffle: Off"
                };
                self.state.toast = Some(Toast::new(label));
            }
            Action::DismissDialog => self.state.dialog = None,
            Action::Resize => {}
        }
    }

    async fn handle_player(&mut self, event: PlayerEvent, tx: &mpsc::Sender<Event>) {
        match event {
            PlayerEvent::Ready { duration } => {
                self.state.duration_secs = duration;
            }
            PlayerEvent::TimeUpdate { seconds } => {
                let highlight = self.state.on_time_update(seconds, Instant::now());
                if highlight.changed {
                    tracing::trace!(active = ?highlight.active, at = seconds, "lyric line changed");
                }
            }
            PlayerEvent::Paused => self.state.paused = true,
            PlayerEvent::Resumed => self.state.paused = false,
            PlayerEvent::Ended => {
                let moved = self.state.playlist.on_song_end().is_some();
                match self.state.playlist.current_index().filter(|_| moved) {
                    Some(index) => self.play_index(index, tx).await,
                    None => self.stop().await,
                }
            }
            PlayerEvent::Error(message) => {
                tracing::warn!(%message, "playback error");
                self.state.show_error("Playback Error", message);
            }
        }
    }

    fn handle_lyrics(&mut self, event: LyricsEvent) {
        match event {
            LyricsEvent::Resolved { song, resolution } => {
                if self.state.apply_resolution(song, resolution) {
                    tracing::debug!(source = ?self.state.lyrics_source, "lyrics installed");
                }
            }
        }
    }

    async fn play_index(&mut self, index: usize, tx: &mpsc::Sender<Event>) {
        let Some(song) = self.state.playlist.set_current(index).cloned() else {
            return;
        };
        self.state.selected = index;
        self.state.now_playing = Some(song.clone());
        self.state.position_secs = 0.0;
        self.state.duration_secs = 0.0;
        self.state.paused = false;

        self.spawn_lyrics_resolve(song.identity(), tx.clone());

        if let Some(backend) = &self.backend
            && let Err(e) = backend.load(&song).await
        {
            tracing::warn!(file = %song.path.display(), error = %format!("{e:#}"), "load failed");
            self.state.show_error("Playback Error", format!("{e:#}"));
        }
    }

    async fn stop(&mut self) {
        if let Some(backend) = &self.backend {
            let _ = backend.stop().await;
        }
        self.state.stop_playback();
    }

    async fn seek(&mut self, delta: f64) {
        if self.state.now_playing.is_none() {
            return;
        }
        if let Some(backend) = &self.backend
            && let Err(e) = backend.seek_relative(delta).await
        {
            self.state.show_error("Playback Error", format!("{e:#}"));
        }
    }

    async fn apply_volume(&mut self) {
        if let Some(backend) = &self.backend {
            let _ = backend.set_volume(self.state.volume).await;
        }
    }

    fn spawn_lyrics_resolve(&mut self, song: SongIdentity, tx: mpsc::Sender<Event>) {
        // Same song again (repeat one): keep what is on screen
        if !self.state.begin_lyrics_load(&song) {
            return;
        }

        let resolver = Arc::clone(&self.resolver);
        tokio::spawn(async move {
            let resolution = resolver.resolve(&song).await;
            let _ = tx
                .send(Event::Lyrics(LyricsEvent::Resolved { song, resolution }))
                .await;
        });
    }
}
