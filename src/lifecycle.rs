//! Per-robot state machine: hit, death spin, removal and respawn.
//!
//! Delays are stored on each robot as an absolute fire time and resolved by
//! [`Lifecycle::advance`], which the frame loop calls once per tick. A tick
//! that arrives late walks every overdue edge in order, so no state is ever
//! skipped, and chained deadlines are measured from the scheduled fire time
//! rather than from the tick that noticed it.

use glam::Vec3;
use log::{debug, trace};

use crate::registry::{RegistryError, RobotRegistry};
use crate::robot::{Millis, RobotId, RobotState};
use crate::settings::GameSettings;

/// Durations the state machine schedules with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTimings {
    /// Length of the death spin clip.
    pub spin_ms: Millis,
    /// Hit to removal.
    pub dying_ms: Millis,
    /// Removal to respawn.
    pub respawn_delay_ms: Millis,
    /// Idle loop length.
    pub idle_period_ms: Millis,
}

impl From<&GameSettings> for LifecycleTimings {
    fn from(settings: &GameSettings) -> Self {
        Self {
            spin_ms: settings.animation_ms,
            dying_ms: settings.dying_ms,
            respawn_delay_ms: settings.respawn_delay_ms,
            idle_period_ms: settings.idle_period_ms(),
        }
    }
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self::from(&GameSettings::default())
    }
}

/// A state change applied by the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Robot that changed.
    pub robot: RobotId,
    /// State before.
    pub from: RobotState,
    /// State after.
    pub to: RobotState,
    /// Scheduled time of the change.
    pub at: Millis,
}

/// Drives robots through their lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    timings: LifecycleTimings,
}

impl Lifecycle {
    /// Creates a lifecycle using `timings`.
    #[must_use]
    pub const fn new(timings: LifecycleTimings) -> Self {
        Self { timings }
    }

    /// The timings in use.
    #[must_use]
    pub const fn timings(&self) -> LifecycleTimings {
        self.timings
    }

    /// Spawns a robot that is idle from `now`.
    pub fn spawn(&self, registry: &mut RobotRegistry, position: Vec3, now: Millis) -> RobotId {
        let id = registry.spawn(position);
        if let Ok(robot) = registry.get_mut(id) {
            robot.animator.start_idle(now, self.timings.idle_period_ms);
        }
        id
    }

    /// Spawns a robot that appears at `wake_at`.
    pub fn spawn_hidden(
        &self,
        registry: &mut RobotRegistry,
        position: Vec3,
        wake_at: Millis,
    ) -> RobotId {
        registry.spawn_hidden(position, wake_at)
    }

    /// Applies a hit.
    ///
    /// Returns `Ok(true)` when the robot was idle and is now dying, and
    /// `Ok(false)` when the hit was ignored because the robot is already
    /// dying, removed or respawning.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown ids.
    pub fn strike(
        &self,
        registry: &mut RobotRegistry,
        id: RobotId,
        now: Millis,
    ) -> Result<bool, RegistryError> {
        let state = registry.get(id)?.state();
        if !state.is_clickable() {
            debug!("{id} ignored hit while {state:?}");
            return Ok(false);
        }
        registry.set_state(id, RobotState::Dying)?;
        let robot = registry.get_mut(id)?;
        robot.animator.start_dying(now, self.timings.spin_ms);
        robot.fire_at = Some(now.saturating_add(self.timings.dying_ms));
        Ok(true)
    }

    /// Fires every transition due at or before `now`.
    ///
    /// Robots are visited in id order and each one walks all of its overdue
    /// edges, so the returned transitions are grouped per robot and ordered
    /// in time within a robot.
    ///
    /// # Errors
    ///
    /// Propagates [`RegistryError`] if the registry rejects an edge, which
    /// means a robot's schedule disagrees with its state.
    pub fn advance(
        &self,
        registry: &mut RobotRegistry,
        now: Millis,
    ) -> Result<Vec<Transition>, RegistryError> {
        let mut fired = Vec::new();
        for id in registry.ids() {
            self.advance_robot(registry, id, now, &mut fired)?;
        }
        Ok(fired)
    }

    fn advance_robot(
        &self,
        registry: &mut RobotRegistry,
        id: RobotId,
        now: Millis,
        fired: &mut Vec<Transition>,
    ) -> Result<(), RegistryError> {
        loop {
            let current = registry.get(id)?;
            let Some(at) = current.fire_at().filter(|&due| due <= now) else {
                return Ok(());
            };
            let from = current.state();
            match from {
                RobotState::Dying => {
                    registry.set_state(id, RobotState::Removed)?;
                    let robot = registry.get_mut(id)?;
                    robot.animator.hold(at);
                    robot.fire_at = Some(at.saturating_add(self.timings.respawn_delay_ms));
                    fired.push(Transition {
                        robot: id,
                        from,
                        to: RobotState::Removed,
                        at,
                    });
                }
                RobotState::Removed => {
                    registry.set_state(id, RobotState::Respawning)?;
                    registry.set_state(id, RobotState::Idle)?;
                    let robot = registry.get_mut(id)?;
                    robot.animator.start_idle(at, self.timings.idle_period_ms);
                    robot.fire_at = None;
                    fired.push(Transition {
                        robot: id,
                        from,
                        to: RobotState::Respawning,
                        at,
                    });
                    fired.push(Transition {
                        robot: id,
                        from: RobotState::Respawning,
                        to: RobotState::Idle,
                        at,
                    });
                }
                RobotState::Idle | RobotState::Respawning => {
                    trace!("{id} had a stale fire time while {from:?}");
                    registry.get_mut(id)?.fire_at = None;
                    return Ok(());
                }
            }
        }
    }
}
