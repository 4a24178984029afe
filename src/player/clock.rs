//! Simulated playback clock
//!
//! Emits the same events as mpv without producing sound. Used when mpv is
//! missing and by the headless `sync` command.

use crate::app::events::{Event, PlayerEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug)]
enum ClockCommand {
    Load { duration: f64 },
    TogglePause,
    SeekRelative(f64),
    Stop,
}

#[derive(Debug, Clone)]
pub struct SimulatedClock {
    cmd_tx: mpsc::UnboundedSender<ClockCommand>,
}

impl SimulatedClock {
    pub fn spawn(event_tx: mpsc::Sender<Event>, tick: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_clock(cmd_rx, event_tx, tick));
        Self { cmd_tx }
    }

    pub fn load(&self, duration: f64) -> anyhow::Result<()> {
        self.send(ClockCommand::Load { duration })
    }

    pub fn toggle_pause(&self) -> anyhow::Result<()> {
        self.send(ClockCommand::TogglePause)
    }

    pub fn seek_relative(&self, seconds: f64) -> anyhow::Result<()> {
        self.send(ClockCommand::SeekRelative(seconds))
    }

    pub fn stop(&self) -> anyhow::Result<()> {
        self.send(ClockCommand::Stop)
    }

    fn send(&self, cmd: ClockCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("simulated clock stopped"))
    }
}

#[derive(Debug)]
struct Playback {
    position: f64,
    duration: f64,
    paused: bool,
    last_tick: Instant,
}

impl Playback {
    fn advance(&mut self, now: Instant) {
        if !self.paused {
            self.position += now.saturating_duration_since(self.last_tick).as_secs_f64();
        }
        self.last_tick = now;
    }
}

async fn run_clock(
    mut cmd_rx: mpsc::UnboundedReceiver<ClockCommand>,
    event_tx: mpsc::Sender<Event>,
    tick: Duration,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut playback: Option<Playback> = None;

    loop {
        let events = tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                apply_command(&mut playback, cmd, Instant::now())
            }
            _ = interval.tick() => tick_events(&mut playback, Instant::now()),
        };

        for ev in events {
            if event_tx.send(Event::Player(ev)).await.is_err() {
                return;
            }
        }
    }
}

fn apply_command(playback: &mut Option<Playback>, cmd: ClockCommand, now: Instant) -> Vec<PlayerEvent> {
    match cmd {
        ClockCommand::Load { duration } => {
            // Negative or non-finite lengths play as an empty track.
            let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
            *playback = Some(Playback {
                position: 0.0,
                duration,
                paused: false,
                last_tick: now,
            });
            vec![
                PlayerEvent::Ready { duration },
                PlayerEvent::Resumed,
                PlayerEvent::TimeUpdate { seconds: 0.0 },
            ]
        }
        ClockCommand::TogglePause => {
            let Some(p) = playback.as_mut() else {
                return Vec::new();
            };
            p.advance(now);
            p.paused = !p.paused;
            vec![if p.paused {
                PlayerEvent::Paused
            } else {
                PlayerEvent::Resumed
            }]
        }
        ClockCommand::SeekRelative(delta) => {
            let Some(p) = playback.as_mut() else {
                return Vec::new();
            };
            p.advance(now);
            p.position = (p.position + delta).max(0.0).min(p.duration);
            vec![PlayerEvent::TimeUpdate { seconds: p.position }]
        }
        ClockCommand::Stop => {
            *playback = None;
            Vec::new()
        }
    }
}

fn tick_events(playback: &mut Option<Playback>, now: Instant) -> Vec<PlayerEvent> {
    let Some(p) = playback.as_mut() else {
        return Vec::new();
    };
    if p.paused {
        p.last_tick = now;
        return Vec::new();
    }
    p.advance(now);
    if p.position >= p.duration {
        *playback = None;
        return vec![PlayerEvent::Ended];
    }
    vec![PlayerEvent::TimeUpdate { seconds: p.position }]
}
