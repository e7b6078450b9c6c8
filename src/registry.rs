//! Registry owning every robot in the session.
//!
//! The registry is the only place robot state changes. Each accepted
//! transition is recorded as a [`SceneEvent`] so the render side can add or
//! remove the robot's visual without polling.

use hashbrown::HashMap;
use log::debug;
use thiserror::Error;

use glam::Vec3;

use crate::robot::{Millis, Robot, RobotId, RobotState};

/// Failures raised by registry operations.
///
/// Neither should occur in play: the dispatcher only strikes robots it found
/// in the registry and guards on state first. Seeing one means the caller and
/// the registry disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No robot with this id exists.
    #[error("unknown robot {id}")]
    NotFound {
        /// The id that was looked up.
        id: RobotId,
    },
    /// The requested state change is not a lifecycle edge.
    #[error("{id} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        /// Robot whose state was being changed.
        id: RobotId,
        /// State at the time of the request.
        from: RobotState,
        /// Requested state.
        to: RobotState,
    },
}

/// Visual change the render side must mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// The robot entered the scene and is clickable.
    Shown(RobotId),
    /// The robot was hit and started its death spin.
    Struck(RobotId),
    /// The robot left the scene.
    Hidden(RobotId),
}

/// Owner of all robots, keyed by id.
#[derive(Debug, Default)]
pub struct RobotRegistry {
    robots: HashMap<RobotId, Robot>,
    by_name: HashMap<String, RobotId>,
    next_id: u32,
    events: Vec<SceneEvent>,
}

impl RobotRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, position: Vec3, state: RobotState) -> RobotId {
        let id = RobotId(self.next_id);
        self.next_id += 1;
        let robot = Robot::new(id, position, state);
        self.by_name.insert(robot.name().to_owned(), id);
        self.robots.insert(id, robot);
        id
    }

    /// Registers an idle robot at `position`.
    ///
    /// The idle clip is not started; the lifecycle does that when it owns the
    /// robot's timing.
    pub fn spawn(&mut self, position: Vec3) -> RobotId {
        let id = self.insert(position, RobotState::Idle);
        debug!("spawned {id} at {position:?}");
        self.events.push(SceneEvent::Shown(id));
        id
    }

    /// Registers a robot that stays out of the scene until `wake_at`.
    pub fn spawn_hidden(&mut self, position: Vec3, wake_at: Millis) -> RobotId {
        let id = self.insert(position, RobotState::Removed);
        if let Some(robot) = self.robots.get_mut(&id) {
            robot.fire_at = Some(wake_at);
        }
        debug!("spawned {id} at {position:?}, appearing at {wake_at}ms");
        id
    }

    /// Looks up a robot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `id` was never spawned.
    pub fn get(&self, id: RobotId) -> Result<&Robot, RegistryError> {
        self.robots.get(&id).ok_or(RegistryError::NotFound { id })
    }

    pub(crate) fn get_mut(&mut self, id: RobotId) -> Result<&mut Robot, RegistryError> {
        self.robots
            .get_mut(&id)
            .ok_or(RegistryError::NotFound { id })
    }

    /// Resolves a display name such as `robot4`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<RobotId> {
        self.by_name.get(name).copied()
    }

    /// Moves a robot along one lifecycle edge.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown ids and
    /// [`RegistryError::InvalidTransition`] when `state` does not follow the
    /// robot's current state.
    pub fn set_state(&mut self, id: RobotId, state: RobotState) -> Result<(), RegistryError> {
        let robot = self.get_mut(id)?;
        let from = robot.state();
        if !from.can_become(state) {
            return Err(RegistryError::InvalidTransition {
                id,
                from,
                to: state,
            });
        }
        robot.set_state_unchecked(state);
        debug!("{id}: {from:?} -> {state:?}");
        match state {
            RobotState::Idle => self.events.push(SceneEvent::Shown(id)),
            RobotState::Dying => self.events.push(SceneEvent::Struck(id)),
            RobotState::Removed => self.events.push(SceneEvent::Hidden(id)),
            RobotState::Respawning => {}
        }
        Ok(())
    }

    /// Ids of robots that can be hit, ascending.
    #[must_use]
    pub fn list_active(&self) -> Vec<RobotId> {
        let mut ids: Vec<_> = self
            .robots
            .values()
            .filter(|robot| robot.state().is_clickable())
            .map(Robot::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every robot, ascending by id.
    #[must_use]
    pub fn robots(&self) -> Vec<&Robot> {
        let mut robots: Vec<_> = self.robots.values().collect();
        robots.sort_unstable_by_key(|robot| robot.id());
        robots
    }

    /// Ids of every robot, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<RobotId> {
        let mut ids: Vec<_> = self.robots.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered robots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.robots.len()
    }

    /// Returns `true` before the first spawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    /// Takes the scene events recorded since the last drain.
    pub fn drain_scene_events(&mut self) -> std::vec::Drain<'_, SceneEvent> {
        self.events.drain(..)
    }
}
