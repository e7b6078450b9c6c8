//! Robot identity, lifecycle state and pose types.

use std::fmt;

use bevy::prelude::Reflect;
use glam::Vec3;

use crate::animation::Animator;

/// Milliseconds since the session clock started.
pub type Millis = u64;

/// Robot identifier with type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct RobotId(pub u32);

impl RobotId {
    /// Returns the raw index.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl From<u32> for RobotId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot{}", self.0)
    }
}

/// Lifecycle phase of a robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum RobotState {
    /// Bobbing in place; visible and clickable.
    Idle,
    /// Playing the death spin after a hit.
    Dying,
    /// Hidden, waiting to come back.
    Removed,
    /// Re-entering the scene.
    Respawning,
}

impl RobotState {
    /// Whether `self -> next` is one of the four lifecycle edges.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Dying)
                | (Self::Dying, Self::Removed)
                | (Self::Removed, Self::Respawning)
                | (Self::Respawning, Self::Idle)
        )
    }

    /// Only idle robots accept hits.
    #[must_use]
    pub const fn is_clickable(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Idle and dying robots are in the scene.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Idle | Self::Dying)
    }
}

/// Where a robot is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World-space translation.
    pub translation: Vec3,
    /// Rotation about the x axis in radians. Zero is upright.
    pub pitch: f32,
}

/// A spawned robot, owned by [`crate::registry::RobotRegistry`].
#[derive(Debug, Clone)]
pub struct Robot {
    id: RobotId,
    name: String,
    home: Vec3,
    state: RobotState,
    /// Absolute time of the next scheduled transition, if any.
    pub(crate) fire_at: Option<Millis>,
    pub(crate) animator: Animator,
}

impl Robot {
    pub(crate) fn new(id: RobotId, home: Vec3, state: RobotState) -> Self {
        Self {
            id,
            name: id.to_string(),
            home,
            state,
            fire_at: None,
            animator: Animator::default(),
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> RobotId {
        self.id
    }

    /// Display name, `robot{index}`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spawn position. The idle bob only changes the height.
    #[must_use]
    pub const fn home(&self) -> Vec3 {
        self.home
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RobotState {
        self.state
    }

    /// Time of the next scheduled transition.
    #[must_use]
    pub const fn fire_at(&self) -> Option<Millis> {
        self.fire_at
    }

    pub(crate) fn set_state_unchecked(&mut self, state: RobotState) {
        self.state = state;
    }

    /// Pose of the robot at `now`.
    #[must_use]
    pub fn pose(&self, now: Millis) -> Pose {
        self.animator.pose(self.home, now)
    }
}
