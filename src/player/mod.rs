//! Playback backends
//!
//! Both report progress as `PlayerEvent`s on the app channel; the lyrics
//! tracker only listens to `PlayerEvent::TimeUpdate`.

pub mod clock;
pub mod mpv;

use crate::playlist::Song;
use clock::SimulatedClock;
use mpv::MpvHandle;

pub enum Backend {
    Mpv(MpvHandle),
    /// Silent clock, used when mpv is unavailable
    Simulated {
        clock: SimulatedClock,
        duration_secs: f64,
    },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Mpv(_) => "mpv",
            Backend::Simulated { .. } => "simulated",
        }
    }

    pub async fn load(&self, song: &Song) -> anyhow::Result<()> {
        if !song.path.is_file() {
            anyhow::bail!("File not found: {}", song.path.display());
        }
        match self {
            Backend::Mpv(mpv) => mpv.load_file(&song.path).await,
            Backend::Simulated {
                clock,
                duration_secs,
            } => clock.load(*duration_secs),
        }
    }

    pub async fn toggle_pause(&self) -> anyhow::Result<()> {
        match self {
            Backend::Mpv(mpv) => mpv.toggle_pause().await,
            Backend::Simulated { clock, .. } => clock.toggle_pause(),
        }
    }

    pub async fn seek_relative(&self, seconds: f64) -> anyhow::Result<()> {
        match self {
            Backend::Mpv(mpv) => mpv.seek_relative(seconds).await,
            Backend::Simulated { clock, .. } => clock.seek_relative(seconds),
        }
    }

    pub async fn set_volume(&self, volume: u8) -> anyhow::Result<()> {
        match self {
            Backend::Mpv(mpv) => mpv.set_volume(volume).await,
            Backend::Simulated { .. } => Ok(()),
        }
    }

    pub async fn set_mute(&self, muted: bool) -> anyhow::Result<()> {
        match self {
            Backend::Mpv(mpv) => mpv.set_mute(muted).await,
            Backend::Simulated { .. } => Ok(()),
        }
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        match self {
            Backend::Mpv(mpv) => mpv.stop().await,
            Backend::Simulated { clock, .. } => clock.stop(),
        }
    }
}
