//! Keyframe clips driving a robot's pose.
//!
//! Each robot owns one [`Animator`] that plays at most one clip at a time:
//! the looping idle bob or the one-shot death spin. Clips are sampled from
//! absolute timestamps, so a frame hitch never desynchronises them and the
//! animator needs no per-frame mutation.

use glam::Vec3;

use crate::constants::{DEATH_PITCH, IDLE_BOB_HIGH, IDLE_BOB_LOW};
use crate::robot::{Millis, Pose};

/// Piecewise-linear keyframe track over normalised time `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframes<const N: usize> {
    keys: [f32; N],
    values: [f32; N],
}

impl<const N: usize> Keyframes<N> {
    /// Builds a track. `keys` must be ascending.
    #[must_use]
    pub const fn new(keys: [f32; N], values: [f32; N]) -> Self {
        Self { keys, values }
    }

    /// Samples the track at normalised time `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn sample(&self, t: f32) -> f32 {
        let clamped = t.clamp(0.0, 1.0);
        let mut previous: Option<(f32, f32)> = None;
        for (&key, &value) in self.keys.iter().zip(&self.values) {
            if clamped <= key {
                return match previous {
                    Some((k0, v0)) if key > k0 => {
                        v0 + (value - v0) * (clamped - k0) / (key - k0)
                    }
                    _ => value,
                };
            }
            previous = Some((key, value));
        }
        previous.map_or(0.0, |(_, value)| value)
    }
}

/// Height keys of the idle bob: sunk, peak, sunk.
pub const IDLE_BOB: Keyframes<3> = Keyframes::new(
    [0.0, 0.5, 1.0],
    [IDLE_BOB_LOW, IDLE_BOB_HIGH, IDLE_BOB_LOW],
);

/// Pitch keys of the death spin: upright to face-down.
pub const DEATH_SPIN: Keyframes<2> = Keyframes::new([0.0, 1.0], [0.0, DEATH_PITCH]);

/// Clip currently playing on an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    /// Nothing plays; the pose holds.
    Still,
    /// Looping idle bob.
    Idle {
        /// Loop start.
        started_at: Millis,
        /// Loop length.
        period_ms: Millis,
    },
    /// One-shot death spin, holding its last frame once finished.
    Dying {
        /// Spin start.
        started_at: Millis,
        /// Spin length.
        duration_ms: Millis,
    },
}

/// Per-robot clip player.
#[derive(Debug, Clone, PartialEq)]
pub struct Animator {
    clip: Clip,
    height: f32,
    pitch: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            clip: Clip::Still,
            height: IDLE_BOB_LOW,
            pitch: 0.0,
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "Clip spans are a few seconds, well inside f32 precision."
)]
fn progress(elapsed: Millis, span: Millis) -> f32 {
    if span == 0 {
        1.0
    } else {
        elapsed as f32 / span as f32
    }
}

impl Animator {
    /// The clip playing now.
    #[must_use]
    pub const fn clip(&self) -> Clip {
        self.clip
    }

    /// Restarts the idle loop from the sunk position at `now`, upright.
    pub fn start_idle(&mut self, now: Millis, period_ms: Millis) {
        self.pitch = 0.0;
        self.clip = Clip::Idle {
            started_at: now,
            period_ms,
        };
    }

    /// Stops the idle loop where it is and starts the death spin.
    pub fn start_dying(&mut self, now: Millis, duration_ms: Millis) {
        self.hold(now);
        self.clip = Clip::Dying {
            started_at: now,
            duration_ms,
        };
    }

    /// Freezes the current pose.
    pub fn hold(&mut self, now: Millis) {
        let (height, pitch) = self.sample(now);
        self.height = height;
        self.pitch = pitch;
        self.clip = Clip::Still;
    }

    /// Pose of a robot whose home is `home`, at `now`.
    #[must_use]
    pub fn pose(&self, home: Vec3, now: Millis) -> Pose {
        let (height, pitch) = self.sample(now);
        Pose {
            translation: Vec3::new(home.x, home.y + height, home.z),
            pitch,
        }
    }

    fn sample(&self, now: Millis) -> (f32, f32) {
        match self.clip {
            Clip::Still => (self.height, self.pitch),
            Clip::Idle {
                started_at,
                period_ms,
            } => {
                let elapsed = now.saturating_sub(started_at);
                let phase = if period_ms == 0 {
                    0
                } else {
                    elapsed % period_ms
                };
                (IDLE_BOB.sample(progress(phase, period_ms)), 0.0)
            }
            Clip::Dying {
                started_at,
                duration_ms,
            } => {
                let elapsed = now.saturating_sub(started_at);
                (self.height, DEATH_SPIN.sample(progress(elapsed, duration_ms)))
            }
        }
    }
}
