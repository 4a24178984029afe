mod app;
mod config;
mod input;
mod lyrics;
mod player;
mod playlist;
mod storage;
mod sync;
mod tui;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use app::events::{Event, PlayerEvent};
use clap::{Parser, Subcommand};
use lyrics::parser::{format_timestamp, parse_lrc};
use lyrics::{LyricsResult, TimedLine};
use player::clock::SimulatedClock;
use playlist::Song;
use sync::LyricTracker;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lrcplay", version, about = "Terminal music player with synced lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Play {
        /// Audio files or directories (current directory when empty).
        paths: Vec<PathBuf>,
    },
    /// Resolve lyrics for an audio file and print them (headless).
    Resolve {
        file: PathBuf,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Parse an LRC file and print its timed lines.
    Parse { lrc: PathBuf },
    /// Replay lyrics against a silent clock, printing each line as it becomes active.
    Sync {
        file: PathBuf,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Seconds to run; defaults to a few seconds past the last line.
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Delete all cached remote lyrics.
    ClearCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };

    let command = cli.command.unwrap_or(Command::Play { paths: Vec::new() });
    let interactive = matches!(command, Command::Play { .. });
    init_logging(&cfg, interactive)?;

    match command {
        Command::Play { paths } => {
            let paths = if paths.is_empty() {
                vec![PathBuf::from(".")]
            } else {
                paths
            };
            let songs = playlist::collect_songs(&paths);
            tracing::info!(songs = songs.len(), "starting player");
            let mut terminal = tui::TerminalGuard::enter(cfg.input.mouse).context("init terminal")?;
            let mut app = app::App::new(cfg, cfg_path, songs)?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Resolve {
            file,
            artist,
            title,
        } => {
            let song = song_for(&file, artist, title);
            let resolver = app::build_resolver(&cfg)?;
            let resolution = resolver.resolve(&song.identity()).await;

            let source = resolution.source.map(|s| s.label()).unwrap_or("none");
            let kind = match &resolution.result {
                LyricsResult::Synced(_) => "synced",
                LyricsResult::Unsynced(_) => "unsynced",
                LyricsResult::None => "none",
            };
            println!("{} ({source}, {kind})", song.display_name());
            if let Some(map) = resolution.result.map() {
                print_lines(map.entries());
            }
        }
        Command::Parse { lrc } => {
            let raw = std::fs::read_to_string(&lrc)
                .with_context(|| format!("read {}", lrc.display()))?;
            let map = parse_lrc(&raw);
            if map.is_empty() {
                anyhow::bail!("{}", lyrics::LyricsError::NoTimedLines(lrc));
            }
            print_lines(map.entries());
        }
        Command::Sync {
            file,
            artist,
            title,
            duration,
        } => {
            let song = song_for(&file, artist, title);
            run_sync(&cfg, &song, duration).await?;
        }
        Command::ClearCache => {
            let removed = storage::LyricsCache::new(cfg.cache_path())
                .clear()
                .context("clear lyrics cache")?;
            println!("Removed {removed} cached lyrics.");
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so it logs to a file; everything else to stderr.
fn init_logging(cfg: &config::Config, interactive: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if interactive {
        let path = cfg.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open log {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .init();
    }
    Ok(())
}

fn song_for(file: &Path, artist: Option<String>, title: Option<String>) -> Song {
    let mut song = Song::from_path(file);
    if let Some(artist) = artist {
        song.artist = artist;
    }
    if let Some(title) = title {
        song.title = title;
    }
    song
}

fn print_lines(lines: &[TimedLine]) {
    for line in lines {
        println!("{} {}", format_timestamp(line.timestamp), line.text);
    }
}

async fn run_sync(cfg: &config::Config, song: &Song, duration: Option<f64>) -> anyhow::Result<()> {
    let resolver = app::build_resolver(cfg)?;
    let resolution = resolver.resolve(&song.identity()).await;
    let source = resolution.source.map(|s| s.label()).unwrap_or("none");
    let map = resolution.result.into_map();
    if map.is_empty() {
        println!("No lyrics for {}", song.display_name());
        return Ok(());
    }

    let duration = duration.unwrap_or_else(|| {
        map.entries()
            .last()
            .map(|l| l.timestamp + 5.0)
            .unwrap_or(0.0)
    });
    config::ensure_duration(duration).context("--duration")?;
    println!("{} ({source}), {:.1}s", song.display_name(), duration);

    let (tx, mut rx) = mpsc::channel::<Event>(64);
    let clock = SimulatedClock::spawn(tx, Duration::from_millis(50));
    let mut tracker = LyricTracker::new(cfg.sync.settings());
    tracker.set_map(map);
    clock.load(duration)?;

    while let Some(event) = rx.recv().await {
        match event {
            Event::Player(PlayerEvent::TimeUpdate { seconds }) => {
                let previous = tracker.active_index();
                let active = tracker.on_time_update(seconds);
                if active != previous
                    && let Some(line) = tracker.active_line()
                {
                    println!("{} {}", format_timestamp(seconds), line.text);
                }
            }
            Event::Player(PlayerEvent::Ended) => break,
            _ => {}
        }
    }

    println!("ended at {}", format_timestamp(tracker.last_query_time()));
    clock.stop()?;
    Ok(())
}
