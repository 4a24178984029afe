//! Smooth scrolling for the lyrics pane
//!
//! Positions are normalized: 0.0 is the top of the content, 1.0 the bottom.

use std::time::{Duration, Instant};

/// Content and viewport sizes in the same unit (rows for the TUI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub content_height: f64,
    pub viewport_height: f64,
}

impl Viewport {
    pub fn new(content_height: f64, viewport_height: f64) -> Self {
        Self {
            content_height,
            viewport_height,
        }
    }

    pub fn scroll_range(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn is_scrollable(&self) -> bool {
        self.content_height > self.viewport_height
    }

    /// Normalized position that centers a line in the viewport, or `None` when
    /// everything already fits.
    pub fn center_on(&self, line_top: f64, line_height: f64) -> Option<f64> {
        if !self.is_scrollable() {
            return None;
        }
        let target = (line_top - self.viewport_height / 2.0 + line_height / 2.0) / self.scroll_range();
        Some(target.clamp(0.0, 1.0))
    }

    /// First visible unit for a normalized position.
    pub fn offset_for(&self, position: f64) -> f64 {
        position.clamp(0.0, 1.0) * self.scroll_range()
    }
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    started: Instant,
}

#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    position: f64,
    animation: Option<Animation>,
    duration: Duration,
    epsilon: f64,
}

impl ScrollAnimator {
    pub fn new(duration: Duration, epsilon: f64) -> Self {
        Self {
            position: 0.0,
            animation: None,
            duration,
            epsilon,
        }
    }

    /// Current normalized position, advancing any running animation.
    pub fn position(&mut self, now: Instant) -> f64 {
        if let Some(anim) = self.animation {
            let progress = self.progress(anim, now);
            self.position = anim.from + (anim.to - anim.from) * ease_out(progress);
            if progress >= 1.0 {
                self.position = anim.to;
                self.animation = None;
            }
        }
        self.position
    }

    /// Start animating towards `target`. Any running animation stops where it
    /// is first. Returns `false` when already within epsilon of the target.
    pub fn scroll_to(&mut self, target: f64, now: Instant) -> bool {
        let current = self.position(now);
        self.animation = None;

        if (current - target).abs() <= self.epsilon {
            return false;
        }

        if self.duration.is_zero() {
            self.position = target;
        } else {
            self.animation = Some(Animation {
                from: current,
                to: target,
                started: now,
            });
        }
        true
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Where the running animation ends, or the resting position.
    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.animation.map(|a| a.to).unwrap_or(self.position)
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
        self.animation = None;
    }

    fn progress(&self, anim: Animation, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(anim.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
