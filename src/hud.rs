//! Heads-up display state handed to the UI layer.
//!
//! The session never touches UI widgets; it records [`HudEvent`]s and the UI
//! applies them. [`HudText`] renders the events into the labels the game
//! shows.

use bevy::prelude::Resource;

/// Visibility of the on-screen controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// The "Play" button shown before the first round.
    pub play: bool,
    /// The score label.
    pub score: bool,
    /// The countdown label.
    pub timer: bool,
    /// The "Reset" button.
    pub reset: bool,
}

impl Controls {
    /// Title screen: only "Play" is visible.
    pub const MENU: Self = Self {
        play: true,
        score: false,
        timer: false,
        reset: false,
    };

    /// In play: everything but "Play" is visible.
    pub const PLAYING: Self = Self {
        play: false,
        score: true,
        timer: true,
        reset: true,
    };
}

impl Default for Controls {
    fn default() -> Self {
        Self::MENU
    }
}

/// A change the UI must reflect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudEvent {
    /// New score.
    ScoreChanged(u32),
    /// New whole seconds remaining.
    TimeChanged(u64),
    /// New control visibility.
    ControlsChanged(Controls),
}

/// Labels as the UI displays them.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    /// "Score: N".
    pub score: String,
    /// "Time: N".
    pub time: String,
    /// Which controls are visible.
    pub controls: Controls,
}

impl Default for HudText {
    fn default() -> Self {
        Self {
            score: format_score(0),
            time: format_time(0),
            controls: Controls::MENU,
        }
    }
}

impl HudText {
    /// Applies one event to the labels.
    pub fn apply(&mut self, event: HudEvent) {
        match event {
            HudEvent::ScoreChanged(score) => self.score = format_score(score),
            HudEvent::TimeChanged(seconds) => self.time = format_time(seconds),
            HudEvent::ControlsChanged(controls) => self.controls = controls,
        }
    }
}

/// Score label text.
#[must_use]
pub fn format_score(score: u32) -> String {
    format!("Score: {score}")
}

/// Countdown label text.
#[must_use]
pub fn format_time(seconds: u64) -> String {
    format!("Time: {seconds}")
}
