//! Games in known states.

use whackabot::settings::SpawnDelay;
use whackabot::{GameSession, GameSettings, Millis, RobotId, RobotState};

/// When robots built by [`idle_session`] first appear.
pub const WAKE_MS: Millis = 1_000;

/// Settings with a fixed spawn delay and seed so games replay exactly.
///
/// # Examples
/// ```
/// use test_utils::session::{fixed_settings, WAKE_MS};
/// let settings = fixed_settings();
/// assert!(settings.spawn_delay_ms.is_fixed());
/// assert_eq!(settings.spawn_delay_ms.min_ms, WAKE_MS);
/// ```
#[must_use]
pub fn fixed_settings() -> GameSettings {
    GameSettings {
        spawn_delay_ms: SpawnDelay::fixed(WAKE_MS),
        seed: Some(7),
        ..GameSettings::default()
    }
}

/// A game started at time zero with every robot idle from [`WAKE_MS`].
///
/// HUD and scene events raised while getting there are drained.
///
/// # Panics
/// Panics if the session rejects the tick that wakes the robots.
#[must_use]
pub fn idle_session(settings: GameSettings) -> GameSession {
    let mut session = GameSession::new(settings);
    session.play(0);
    session
        .tick(WAKE_MS)
        .unwrap_or_else(|e| panic!("waking robots failed: {e}"));
    session.drain_hud_events().for_each(drop);
    session.drain_scene_events().for_each(drop);
    session
}

/// Time at which a robot idling since `since` is at the top of its bob.
#[must_use]
pub fn bob_peak(session: &GameSession, since: Millis) -> Millis {
    since + session.settings().idle_period_ms() / 2
}

/// The `index`-th robot in id order.
///
/// # Panics
/// Panics if the session holds fewer robots.
#[must_use]
pub fn nth_robot(session: &GameSession, index: usize) -> RobotId {
    session
        .registry()
        .ids()
        .get(index)
        .copied()
        .unwrap_or_else(|| panic!("no robot at index {index}"))
}

/// State of `robot`.
///
/// # Panics
/// Panics if the robot is unknown.
#[must_use]
pub fn state_of(session: &GameSession, robot: RobotId) -> RobotState {
    session
        .registry()
        .get(robot)
        .unwrap_or_else(|e| panic!("{e}"))
        .state()
}
