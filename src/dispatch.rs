//! Pointer click to robot hit.
//!
//! A click is normalised to device coordinates, handed to a [`Raycaster`],
//! and the nearest hit decides the outcome. Only an idle robot scores; every
//! other hit, or no hit, leaves the game untouched.

use log::{debug, info};

use crate::lifecycle::Lifecycle;
use crate::picking::{normalize_pointer, PickTarget, Raycaster};
use crate::registry::{RegistryError, RobotRegistry};
use crate::robot::{Millis, RobotId};
use crate::round::RoundController;

/// A pointer press in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenClick {
    /// Horizontal position from the left edge.
    pub x: f32,
    /// Vertical position from the top edge.
    pub y: f32,
    /// Viewport width.
    pub width: f32,
    /// Viewport height.
    pub height: f32,
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An idle robot was hit; `score` is the round total afterwards.
    Scored {
        /// Robot that was hit.
        robot: RobotId,
        /// Round score after the reward.
        score: u32,
    },
    /// The nearest hit was a robot that is not idle.
    Ignored {
        /// Robot that was hit.
        robot: RobotId,
    },
    /// Nothing clickable was under the pointer.
    Missed,
}

/// Turns clicks into strikes and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestDispatcher {
    reward: u32,
}

impl HitTestDispatcher {
    /// Creates a dispatcher awarding `reward` points per hit.
    #[must_use]
    pub const fn new(reward: u32) -> Self {
        Self { reward }
    }

    /// Resolves `click` and applies its effect.
    ///
    /// The strike and the score change happen together; a robot scores at
    /// most once per life because the strike is refused unless it is idle.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the raycaster reports a robot
    /// the registry does not know.
    pub fn dispatch(
        &self,
        click: ScreenClick,
        raycaster: &dyn Raycaster,
        lifecycle: &Lifecycle,
        registry: &mut RobotRegistry,
        round: &mut RoundController,
        now: Millis,
    ) -> Result<ClickOutcome, RegistryError> {
        let Some(ndc) = normalize_pointer(click.x, click.y, click.width, click.height) else {
            debug!("click on empty viewport ignored");
            return Ok(ClickOutcome::Missed);
        };
        let nearest = raycaster
            .cast(ndc)
            .into_iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        let Some(PickTarget::Robot(robot)) = nearest.map(|hit| hit.target) else {
            return Ok(ClickOutcome::Missed);
        };
        if !lifecycle.strike(registry, robot, now)? {
            return Ok(ClickOutcome::Ignored { robot });
        }
        round.on_score(self.reward);
        let score = round.current_score();
        info!("hit {robot} at {now}ms, score {score}");
        Ok(ClickOutcome::Scored { robot, score })
    }
}
