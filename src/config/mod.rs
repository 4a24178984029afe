use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lyrics::{LyricsOvhClient, ResolverSettings};
use crate::sync::SyncSettings;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub paths: PathsConfig,
    pub lyrics: LyricsConfig,
    pub sync: SyncConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Cache database and log file live here
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Directory searched for `<audio stem>.lrc`
    pub dir: PathBuf,
    /// Query the remote lyrics service when no local file exists
    pub remote: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Spacing between lines of unsynced lyrics. A rough guess, not derived
    /// from the track.
    pub unsynced_spacing_secs: f64,
    /// Show the built-in demo lyrics when nothing is found
    pub fallback: bool,
    /// Keep remote lyrics in the sqlite cache
    pub cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Added to the playback time before matching a line
    pub bias_secs: f64,
    /// Largest distance at which a line still counts as current
    pub tolerance_secs: f64,
    pub scroll_duration_ms: u64,
    /// Scroll requests closer than this (normalized) are ignored
    pub scroll_epsilon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Volume level (0-100)
    pub volume: u8,
    /// Track length assumed by the simulated clock
    pub simulated_duration_secs: f64,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "lrcplay", "lrcplay")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("lrcplay"))
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir().join("lyrics"),
            remote: true,
            base_url: LyricsOvhClient::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            unsynced_spacing_secs: 4.2,
            fallback: true,
            cache: true,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        let defaults = SyncSettings::default();
        Self {
            bias_secs: defaults.bias,
            tolerance_secs: defaults.tolerance,
            scroll_duration_ms: 400,
            scroll_epsilon: 0.001,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_device: None,
            volume: 80,
            simulated_duration_secs: 240.0,
        }
    }
}

impl Config {
    pub fn cache_path(&self) -> PathBuf {
        self.paths.data_dir.join("cache.sqlite3")
    }

    pub fn log_path(&self) -> PathBuf {
        self.paths.data_dir.join("lrcplay.log")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure_duration(self.player.simulated_duration_secs)
            .context("player.simulated_duration_secs")
    }
}

/// Track lengths must be finite and positive.
pub fn ensure_duration(secs: f64) -> anyhow::Result<()> {
    anyhow::ensure!(
        secs.is_finite() && secs > 0.0,
        "duration must be a positive number of seconds, got {secs}"
    );
    Ok(())
}

impl LyricsConfig {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            lyrics_dir: self.dir.clone(),
            unsynced_spacing: self.unsynced_spacing_secs,
            fallback: self.fallback,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SyncConfig {
    pub fn settings(&self) -> SyncSettings {
        SyncSettings {
            bias: self.bias_secs,
            tolerance: self.tolerance_secs,
        }
    }

    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = project_dirs().context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        write_config(&cfg, &path).context("write default config")?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate().with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[sync]
bias_secs = 0.5

[lyrics]
remote = false
"#,
        )
        .unwrap();
        assert_eq!(cfg.sync.bias_secs, 0.5);
        assert_eq!(cfg.sync.tolerance_secs, 1.0);
        assert!(!cfg.lyrics.remote);
        assert_eq!(cfg.lyrics.unsynced_spacing_secs, 4.2);
        assert_eq!(cfg.player.volume, 80);
    }

    #[test]
    fn test_rejects_bad_simulated_duration() {
        assert!(Config::default().validate().is_ok());

        let dir = std::env::temp_dir().join(format!("lrcplay-config-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        for value in ["-1.0", "0.0", "nan", "inf"] {
            fs::write(&path, format!("[player]\nsimulated_duration_secs = {value}\n")).unwrap();
            let err = load(Some(&path)).unwrap_err();
            assert!(format!("{err:#}").contains("simulated_duration_secs"), "{value}: {err:#}");
        }
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = std::env::temp_dir().join(format!("lrcplay-config-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("config.toml");

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.sync.scroll_duration_ms, 400);

        let mut changed = cfg.clone();
        changed.player.volume = 35;
        save(&changed, Some(&path)).unwrap();
        assert_eq!(load(Some(&path)).unwrap().player.volume, 35);
    }

    #[test]
    fn test_settings_conversion() {
        let cfg = Config::default();
        assert_eq!(cfg.sync.settings(), SyncSettings::default());
        assert_eq!(cfg.sync.scroll_duration(), Duration::from_millis(400));
        assert!(cfg.lyrics.resolver_settings().fallback);
    }
}
