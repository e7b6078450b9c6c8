//! Countdown and score for the current round.

use log::info;

use crate::robot::Millis;

/// Result of a [`RoundController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTick {
    /// Time remains; holds the remaining milliseconds.
    Running(Millis),
    /// The deadline passed and a fresh round started.
    Reset,
}

/// Owns the round deadline and score.
///
/// Expiry restarts the round instead of ending the game, so play continues
/// until the host stops ticking.
///
/// # Examples
///
/// ```
/// use whackabot::round::{RoundController, RoundTick};
///
/// let mut round = RoundController::new(30_000);
/// round.start_round(0);
/// round.on_score(5);
/// assert_eq!(round.tick(29_999), RoundTick::Running(1));
/// assert_eq!(round.tick(30_000), RoundTick::Reset);
/// assert_eq!(round.current_score(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundController {
    duration_ms: Millis,
    deadline: Option<Millis>,
    score: u32,
}

impl RoundController {
    /// Creates a controller with no round running.
    #[must_use]
    pub const fn new(duration_ms: Millis) -> Self {
        Self {
            duration_ms,
            deadline: None,
            score: 0,
        }
    }

    /// Starts a new round at `now`: zero score, deadline `now + duration`.
    ///
    /// The deadline never moves backwards or repeats; a restart within the
    /// same millisecond pushes it one past the previous one.
    pub fn start_round(&mut self, now: Millis) {
        let mut deadline = now.saturating_add(self.duration_ms);
        if let Some(previous) = self.deadline {
            deadline = deadline.max(previous.saturating_add(1));
        }
        self.deadline = Some(deadline);
        self.score = 0;
        info!("round started at {now}ms, ends at {deadline}ms");
    }

    /// Checks the deadline, restarting the round once it has passed.
    ///
    /// Before the first [`RoundController::start_round`] this starts one.
    pub fn tick(&mut self, now: Millis) -> RoundTick {
        match self.deadline {
            Some(deadline) if deadline > now => RoundTick::Running(deadline - now),
            _ => {
                self.start_round(now);
                RoundTick::Reset
            }
        }
    }

    /// Adds `points` to the score.
    pub fn on_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Score of the current round.
    #[must_use]
    pub const fn current_score(&self) -> u32 {
        self.score
    }

    /// Absolute end of the current round.
    #[must_use]
    pub const fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    /// Configured round length.
    #[must_use]
    pub const fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    /// Whole seconds left at `now`, rounded half up and floored at zero.
    #[must_use]
    pub fn remaining_seconds(&self, now: Millis) -> u64 {
        self.deadline
            .map_or(0, |deadline| deadline.saturating_sub(now).saturating_add(500) / 1_000)
    }
}
