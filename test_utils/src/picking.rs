//! Clicks and ray hits aimed at robots.

use glam::Vec3;
use whackabot::picking::CapturedHits;
use whackabot::{CameraRig, GameSession, Millis, PickTarget, RayHit, RobotId, ScreenClick};

/// Viewport width used by [`click_on`].
pub const VIEWPORT_WIDTH: f32 = 800.0;
/// Viewport height used by [`click_on`].
pub const VIEWPORT_HEIGHT: f32 = 600.0;

/// A click in the middle of the viewport.
#[must_use]
pub fn centre_click() -> ScreenClick {
    ScreenClick {
        x: VIEWPORT_WIDTH / 2.0,
        y: VIEWPORT_HEIGHT / 2.0,
        width: VIEWPORT_WIDTH,
        height: VIEWPORT_HEIGHT,
    }
}

/// A click over the centre of `robot`'s pick volume as posed at `now`.
///
/// # Panics
/// Panics if the robot is unknown or behind the camera.
#[must_use]
pub fn click_on(session: &GameSession, robot: RobotId, now: Millis) -> ScreenClick {
    let pose = session
        .registry()
        .get(robot)
        .unwrap_or_else(|e| panic!("{e}"))
        .pose(now);
    let centre = pose.translation + Vec3::Y * session.settings().hit_height;
    let rig = CameraRig::for_aspect(VIEWPORT_WIDTH / VIEWPORT_HEIGHT);
    let ndc = rig
        .project(centre)
        .unwrap_or_else(|| panic!("{robot} is behind the camera"));
    ScreenClick {
        x: (ndc.x + 1.0) / 2.0 * VIEWPORT_WIDTH,
        y: (1.0 - ndc.y) / 2.0 * VIEWPORT_HEIGHT,
        width: VIEWPORT_WIDTH,
        height: VIEWPORT_HEIGHT,
    }
}

/// Scripted hits: `robot` nearest, ground behind it.
#[must_use]
pub fn hits_on(robot: RobotId) -> CapturedHits {
    CapturedHits(vec![
        RayHit {
            target: PickTarget::Robot(robot),
            distance: 40.0,
        },
        RayHit {
            target: PickTarget::Scenery,
            distance: 60.0,
        },
    ])
}

/// Scripted hits on the ground only.
#[must_use]
pub fn scenery_only() -> CapturedHits {
    CapturedHits(vec![RayHit {
        target: PickTarget::Scenery,
        distance: 60.0,
    }])
}
