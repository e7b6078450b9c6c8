//! The game session: sole owner of robots, round and HUD state.
//!
//! Every entry point takes the current session time explicitly. The session
//! itself never reads a clock, which keeps a whole game reproducible from a
//! seed and a list of timestamped inputs.

use bevy::prelude::Resource;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dispatch::{ClickOutcome, HitTestDispatcher, ScreenClick};
use crate::hud::{Controls, HudEvent};
use crate::lifecycle::{Lifecycle, LifecycleTimings, Transition};
use crate::picking::{
    normalize_pointer, CameraRig, CapturedHits, HitVolume, Raycaster, SceneRaycaster,
};
use crate::registry::{RegistryError, RobotRegistry, SceneEvent};
use crate::robot::{Millis, Pose, RobotId, RobotState};
use crate::round::{RoundController, RoundTick};
use crate::settings::GameSettings;

/// Whether a game is under way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Title screen; clicks and ticks do nothing.
    #[default]
    Menu,
    /// Rounds are running.
    Playing,
}

/// What one frame tick changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Lifecycle transitions fired this frame, grouped per robot.
    pub transitions: Vec<Transition>,
    /// Whether the round expired and restarted.
    pub round_reset: bool,
}

/// Snapshot of one robot for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotView {
    /// Robot identity.
    pub id: RobotId,
    /// Lifecycle state.
    pub state: RobotState,
    /// Pose at the requested time.
    pub pose: Pose,
}

/// One player's game.
#[derive(Resource, Debug)]
pub struct GameSession {
    settings: GameSettings,
    registry: RobotRegistry,
    lifecycle: Lifecycle,
    round: RoundController,
    dispatcher: HitTestDispatcher,
    phase: Phase,
    rng: StdRng,
    hud: Vec<HudEvent>,
    shown_seconds: Option<u64>,
}

impl GameSession {
    /// Creates a session on the title screen.
    ///
    /// Spawn jitter is seeded from `settings.seed`, or from entropy when no
    /// seed is set.
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        let rng = settings
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            registry: RobotRegistry::new(),
            lifecycle: Lifecycle::new(LifecycleTimings::from(&settings)),
            round: RoundController::new(settings.round_ms),
            dispatcher: HitTestDispatcher::new(settings.reward),
            phase: Phase::Menu,
            rng,
            hud: Vec::new(),
            shown_seconds: None,
            settings,
        }
    }

    /// Settings the session was created with.
    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Read access to the robots.
    #[must_use]
    pub const fn registry(&self) -> &RobotRegistry {
        &self.registry
    }

    /// Read access to the round.
    #[must_use]
    pub const fn round(&self) -> &RoundController {
        &self.round
    }

    /// Score of the current round.
    #[must_use]
    pub const fn current_score(&self) -> u32 {
        self.round.current_score()
    }

    /// Whole seconds left in the round at `now`.
    #[must_use]
    pub fn remaining_seconds(&self, now: Millis) -> u64 {
        self.round.remaining_seconds(now)
    }

    /// Leaves the title screen and starts the first round.
    ///
    /// Does nothing once playing; use [`GameSession::reset`] to restart.
    pub fn play(&mut self, now: Millis) {
        if self.phase == Phase::Playing {
            debug!("play ignored; already playing");
            return;
        }
        self.phase = Phase::Playing;
        self.hud.push(HudEvent::ControlsChanged(Controls::PLAYING));
        self.reset(now);
    }

    /// Restarts the round: zero score, fresh deadline.
    ///
    /// The first reset also populates the field. Robots are left as they
    /// are on later resets.
    pub fn reset(&mut self, now: Millis) {
        if self.phase == Phase::Menu {
            debug!("reset ignored on the title screen");
            return;
        }
        self.round.start_round(now);
        self.hud.push(HudEvent::ScoreChanged(0));
        self.publish_time(now);
        if self.registry.is_empty() {
            self.populate(now);
        }
    }

    fn populate(&mut self, now: Millis) {
        let delay = self.settings.spawn_delay_ms;
        let homes: Vec<_> = self.settings.home_positions().collect();
        for home in homes {
            let wait = if delay.is_fixed() {
                delay.min_ms
            } else {
                self.rng.gen_range(delay.min_ms..delay.max_ms)
            };
            self.lifecycle
                .spawn_hidden(&mut self.registry, home, now.saturating_add(wait));
        }
        info!("populated {} robots", self.registry.len());
    }

    /// Handles a click using the stock scene geometry.
    ///
    /// # Errors
    ///
    /// See [`GameSession::click_with`].
    pub fn click(&mut self, click: ScreenClick, now: Millis) -> Result<ClickOutcome, RegistryError> {
        let Some(ndc) = normalize_pointer(click.x, click.y, click.width, click.height) else {
            return Ok(ClickOutcome::Missed);
        };
        let rig = CameraRig::for_aspect(click.width / click.height);
        let volume = HitVolume::from(&self.settings);
        let hits = CapturedHits(SceneRaycaster::new(rig, volume, &self.registry, now).cast(ndc));
        self.click_with(click, &hits, now)
    }

    /// Handles a click, picking through `raycaster`.
    ///
    /// Clicks on the title screen are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the raycaster names a robot the
    /// registry does not hold.
    pub fn click_with(
        &mut self,
        click: ScreenClick,
        raycaster: &dyn Raycaster,
        now: Millis,
    ) -> Result<ClickOutcome, RegistryError> {
        if self.phase == Phase::Menu {
            return Ok(ClickOutcome::Missed);
        }
        let outcome = self.dispatcher.dispatch(
            click,
            raycaster,
            &self.lifecycle,
            &mut self.registry,
            &mut self.round,
            now,
        )?;
        if let ClickOutcome::Scored { score, .. } = outcome {
            self.hud.push(HudEvent::ScoreChanged(score));
        }
        Ok(outcome)
    }

    /// Advances the game to `now`: robot lifecycles first, then the round.
    ///
    /// # Errors
    ///
    /// Propagates [`RegistryError`] from the lifecycle.
    pub fn tick(&mut self, now: Millis) -> Result<FrameReport, RegistryError> {
        if self.phase == Phase::Menu {
            return Ok(FrameReport::default());
        }
        let transitions = self.lifecycle.advance(&mut self.registry, now)?;
        let round_reset = self.round.tick(now) == RoundTick::Reset;
        if round_reset {
            info!("time up at {now}ms");
            self.hud.push(HudEvent::ScoreChanged(0));
        }
        self.publish_time(now);
        Ok(FrameReport {
            transitions,
            round_reset,
        })
    }

    fn publish_time(&mut self, now: Millis) {
        let seconds = self.round.remaining_seconds(now);
        if self.shown_seconds != Some(seconds) {
            self.shown_seconds = Some(seconds);
            self.hud.push(HudEvent::TimeChanged(seconds));
        }
    }

    /// Every robot posed at `now`, ascending by id.
    #[must_use]
    pub fn robot_views(&self, now: Millis) -> Vec<RobotView> {
        self.registry
            .robots()
            .into_iter()
            .map(|robot| RobotView {
                id: robot.id(),
                state: robot.state(),
                pose: robot.pose(now),
            })
            .collect()
    }

    /// Takes HUD changes recorded since the last drain.
    pub fn drain_hud_events(&mut self) -> std::vec::Drain<'_, HudEvent> {
        self.hud.drain(..)
    }

    /// Takes scene changes recorded since the last drain.
    pub fn drain_scene_events(&mut self) -> std::vec::Drain<'_, SceneEvent> {
        self.registry.drain_scene_events()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SpawnDelay;
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> GameSettings {
        GameSettings {
            spawn_delay_ms: SpawnDelay::fixed(1_000),
            seed: Some(1),
            ..GameSettings::default()
        }
    }

    fn states(session: &GameSession) -> Vec<RobotState> {
        session.robot_views(0).iter().map(|view| view.state).collect()
    }

    #[rstest]
    fn menu_ignores_ticks_and_clicks(settings: GameSettings) {
        let mut session = GameSession::new(settings);
        let report = session.tick(5_000).expect("tick");
        assert_eq!(report, FrameReport::default());
        let click = ScreenClick {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(session.click(click, 5_000), Ok(ClickOutcome::Missed));
        assert!(session.registry().is_empty());
        assert_eq!(session.drain_hud_events().count(), 0);
    }

    #[rstest]
    fn play_populates_hidden_robots_and_shows_hud(settings: GameSettings) {
        let mut session = GameSession::new(settings);
        session.play(0);
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.registry().len(), 9);
        assert!(states(&session).iter().all(|&s| s == RobotState::Removed));
        let events: Vec<_> = session.drain_hud_events().collect();
        assert_eq!(
            events,
            vec![
                HudEvent::ControlsChanged(Controls::PLAYING),
                HudEvent::ScoreChanged(0),
                HudEvent::TimeChanged(30),
            ]
        );
    }

    #[rstest]
    fn robots_appear_after_spawn_delay(settings: GameSettings) {
        let mut session = GameSession::new(settings);
        session.play(0);
        session.tick(999).expect("tick");
        assert!(session.registry().list_active().is_empty());
        session.tick(1_000).expect("tick");
        assert_eq!(session.registry().list_active().len(), 9);
    }

    #[rstest]
    fn second_play_does_not_repopulate(settings: GameSettings) {
        let mut session = GameSession::new(settings);
        session.play(0);
        session.play(10);
        session.reset(20);
        assert_eq!(session.registry().len(), 9);
    }

    #[test]
    fn randomised_delays_stay_in_range() {
        let mut session = GameSession::new(GameSettings {
            seed: Some(42),
            ..GameSettings::default()
        });
        session.play(100);
        for robot in session.registry().robots() {
            let wake = robot.fire_at().expect("hidden robot has a wake time");
            assert!((2_100..12_100).contains(&wake), "wake {wake} out of range");
        }
    }

    #[test]
    fn late_start_with_long_delay_wakes_at_the_end_of_time() {
        let mut session = GameSession::new(GameSettings {
            spawn_delay_ms: SpawnDelay::fixed(u64::MAX),
            seed: Some(1),
            ..GameSettings::default()
        });
        session.play(1_000);
        for robot in session.registry().robots() {
            assert_eq!(robot.fire_at(), Some(u64::MAX));
        }
    }

    #[rstest]
    fn time_events_only_on_whole_second_changes(settings: GameSettings) {
        let mut session = GameSession::new(settings);
        session.play(0);
        session.drain_hud_events().for_each(drop);
        session.tick(100).expect("tick");
        session.tick(200).expect("tick");
        assert_eq!(session.drain_hud_events().count(), 0);
        session.tick(600).expect("tick");
        let events: Vec<_> = session.drain_hud_events().collect();
        assert_eq!(events, vec![HudEvent::TimeChanged(29)]);
    }

    #[rstest]
    fn expiry_resets_score_and_reports(settings: GameSettings) {
        let mut session = GameSession::new(settings);
        session.play(0);
        let report = session.tick(30_000).expect("tick");
        assert!(report.round_reset);
        assert_eq!(session.round().deadline(), Some(60_000));
        assert!(session
            .drain_hud_events()
            .any(|event| event == HudEvent::ScoreChanged(0)));
    }
}
