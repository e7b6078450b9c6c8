//! Bevy plugin driving a [`GameSession`] from the ECS schedule.
//!
//! The session stays the single source of truth. This module only feeds it
//! time and input, mirrors robots onto ECS entities for the renderer, and
//! republishes HUD and scene changes as observer events.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use hashbrown::HashMap;
use log::{debug, error};
use thiserror::Error;

use crate::dispatch::{ClickOutcome, ScreenClick};
use crate::hud::{HudEvent, HudText};
use crate::registry::SceneEvent;
use crate::robot::{Millis, Pose, RobotId};
use crate::session::GameSession;
use crate::settings::GameSettings;

/// Session time derived from Bevy's [`Time`].
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    /// Milliseconds since the app started.
    pub now_ms: Millis,
}

/// Links an ECS entity to the robot it draws.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct RobotTag(pub RobotId);

/// Pose mirrored from the session each frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RobotPose(pub Pose);

/// Whether the robot is in the scene.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotVisible(pub bool);

/// Maps robots to their mirror entities.
#[derive(Resource, Debug, Default)]
pub struct RobotEntities(HashMap<RobotId, Entity>);

impl RobotEntities {
    /// Entity mirroring `robot`, once spawned.
    #[must_use]
    pub fn get(&self, robot: RobotId) -> Option<Entity> {
        self.0.get(&robot).copied()
    }
}

/// Request to leave the title screen.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct PlayRequested;

/// Request to restart the round.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetRequested;

/// Pointer press in viewport pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerClick {
    /// Horizontal position from the left edge.
    pub x: f32,
    /// Vertical position from the top edge.
    pub y: f32,
    /// Viewport width.
    pub width: f32,
    /// Viewport height.
    pub height: f32,
}

/// Raised after every [`PointerClick`] with what it did.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickResolved(pub ClickOutcome);

/// Raised for each HUD change, after [`HudText`] is updated.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudChanged(pub HudEvent);

/// Raised for each robot entering, leaving or being struck in the scene.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneChanged(pub SceneEvent);

/// Where a [`SessionError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorContext {
    /// While installing the plugin.
    Init,
    /// While handling a click.
    Click,
    /// While ticking the session.
    Tick,
}

/// Event raised when the session reports an invariant violation.
#[derive(Event, Debug, Clone, Error)]
#[error("{context:?}: {detail}")]
pub struct SessionError {
    /// Where the failure occurred.
    pub context: SessionErrorContext,
    /// Description of the underlying error.
    pub detail: String,
}

impl SessionError {
    /// Convenience constructor used by systems to emit error events.
    pub fn new(context: SessionErrorContext, detail: impl Into<String>) -> Self {
        Self {
            context,
            detail: detail.into(),
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_session_error(event: On<SessionError>) {
    let SessionError { context, detail } = event.event();
    error!("game session error during {context:?}: {detail}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn advance_clock_system(time: Res<Time>, mut clock: ResMut<GameClock>) {
    clock.now_ms = Millis::try_from(time.elapsed().as_millis()).unwrap_or(Millis::MAX);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn tick_session_system(
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    clock: Res<GameClock>,
) {
    match session.tick(clock.now_ms) {
        Ok(report) => {
            for transition in report.transitions {
                debug!(
                    "{} {:?} -> {:?} at {}ms",
                    transition.robot, transition.from, transition.to, transition.at
                );
            }
        }
        Err(e) => commands.trigger(SessionError::new(SessionErrorContext::Tick, e.to_string())),
    }
}

/// Spawns a mirror entity for each new robot and copies pose and visibility
/// onto every mirror.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_robot_entities_system(
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    clock: Res<GameClock>,
    mut entities: ResMut<RobotEntities>,
    mut mirrors: Query<(&mut RobotPose, &mut RobotVisible), With<RobotTag>>,
) {
    let scene_events: Vec<_> = session.drain_scene_events().collect();
    for event in scene_events {
        commands.trigger(SceneChanged(event));
    }

    for view in session.robot_views(clock.now_ms) {
        let visible = view.state.is_visible();
        match entities.0.get(&view.id) {
            Some(&entity) => {
                if let Ok((mut pose, mut shown)) = mirrors.get_mut(entity) {
                    pose.0 = view.pose;
                    shown.0 = visible;
                }
            }
            None => {
                let entity = commands
                    .spawn((
                        RobotTag(view.id),
                        Name::new(view.id.to_string()),
                        RobotPose(view.pose),
                        RobotVisible(visible),
                    ))
                    .id();
                entities.0.insert(view.id, entity);
            }
        }
    }
}

fn publish_hud_system(
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    mut hud: ResMut<HudText>,
) {
    let events: Vec<_> = session.drain_hud_events().collect();
    for event in events {
        hud.apply(event);
        commands.trigger(HudChanged(event));
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_play_requested(
    _event: On<PlayRequested>,
    mut session: ResMut<GameSession>,
    clock: Res<GameClock>,
) {
    session.play(clock.now_ms);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_reset_requested(
    _event: On<ResetRequested>,
    mut session: ResMut<GameSession>,
    clock: Res<GameClock>,
) {
    session.reset(clock.now_ms);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_pointer_click(
    event: On<PointerClick>,
    mut commands: Commands,
    mut session: ResMut<GameSession>,
    clock: Res<GameClock>,
) {
    let PointerClick {
        x,
        y,
        width,
        height,
    } = *event.event();
    let click = ScreenClick {
        x,
        y,
        width,
        height,
    };
    match session.click(click, clock.now_ms) {
        Ok(outcome) => commands.trigger(ClickResolved(outcome)),
        Err(e) => commands.trigger(SessionError::new(SessionErrorContext::Click, e.to_string())),
    }
}

/// Plugin installing the game session and its systems.
///
/// Insert a [`GameSettings`] resource before adding the plugin to override
/// the defaults. Invalid settings raise a [`SessionError`] and leave the
/// plugin uninstalled.
///
/// # Examples
///
/// ```
/// use bevy::prelude::*;
/// use whackabot::{GameSession, PlayRequested, WhackPlugin};
///
/// let mut app = App::new();
/// app.add_plugins(MinimalPlugins).add_plugins(WhackPlugin);
/// app.world_mut().trigger(PlayRequested);
/// app.update();
/// assert_eq!(app.world().resource::<GameSession>().registry().len(), 9);
/// ```
#[derive(Debug, Default)]
pub struct WhackPlugin;

impl Plugin for WhackPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_session_error);

        app.init_resource::<GameSettings>();
        let settings = app.world().resource::<GameSettings>().clone();
        if let Err(e) = settings.validate() {
            app.world_mut()
                .trigger(SessionError::new(SessionErrorContext::Init, e.to_string()));
            return;
        }

        app.register_type::<RobotTag>();
        app.insert_resource(GameSession::new(settings));
        app.init_resource::<GameClock>();
        app.init_resource::<HudText>();
        app.init_resource::<RobotEntities>();

        app.add_observer(on_play_requested);
        app.add_observer(on_reset_requested);
        app.add_observer(on_pointer_click);

        app.add_systems(
            Update,
            (
                advance_clock_system,
                tick_session_system,
                sync_robot_entities_system,
                publish_hud_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;
    use rstest::rstest;

    #[rstest]
    fn plugin_initialises_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(WhackPlugin);
        assert!(app.world().contains_resource::<GameSession>());
        assert!(app.world().contains_resource::<GameClock>());
        assert!(app.world().contains_resource::<HudText>());
        app.update();
        assert_eq!(
            app.world().resource::<GameSession>().phase(),
            Phase::Menu
        );
    }

    #[rstest]
    fn invalid_settings_skip_installation() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameSettings {
            round_ms: 0,
            ..GameSettings::default()
        });
        app.add_plugins(WhackPlugin);
        assert!(!app.world().contains_resource::<GameSession>());
    }

    #[rstest]
    fn play_spawns_one_mirror_per_robot() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(WhackPlugin);
        app.world_mut().trigger(PlayRequested);
        app.update();
        app.update();
        let world = app.world_mut();
        let mut query = world.query::<(&RobotTag, &RobotVisible)>();
        let mirrors: Vec<_> = query.iter(world).collect();
        assert_eq!(mirrors.len(), 9);
        assert!(mirrors.iter().all(|(_, visible)| !visible.0));
    }
}
