//! Background-music crossfade bookkeeping
//!
//! Pure time-based volume interpolation; actually mixing audio is the
//! presentation layer's job. The crossfade advances every tick regardless
//! of screen so transitions stay smooth across state changes.

use crate::consts::BGM_FADE_MS;

/// Linear volume crossfade toward a target level
#[derive(Debug, Clone, Copy)]
pub struct AudioCrossfade {
    current: f32,
    target: f32,
}

impl Default for AudioCrossfade {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AudioCrossfade {
    pub fn new(level: f32) -> Self {
        let level = level.clamp(0.0, 1.0);
        Self {
            current: level,
            target: level,
        }
    }

    /// Set the level to fade toward
    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    /// Jump immediately, no fade (new game, mute)
    pub fn snap_to(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        self.current = level;
        self.target = level;
    }

    /// Advance the fade; full range takes `BGM_FADE_MS`
    pub fn tick(&mut self, dt: f32) {
        let step = dt / BGM_FADE_MS;
        let delta = self.target - self.current;
        if delta.abs() <= step {
            self.current = self.target;
        } else {
            self.current += step * delta.signum();
        }
    }

    /// Volume the host should play bgm at right now
    pub fn level(&self) -> f32 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}
