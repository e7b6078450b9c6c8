//! Screen-space picking against the play field.
//!
//! [`Raycaster`] is the seam between the dispatcher and whatever owns the
//! scene geometry. [`SceneRaycaster`] implements it for the stock scene: a
//! perspective camera looking down at a ground plane, with one pick sphere
//! per robot that is currently in the scene.

use glam::{Quat, Vec2, Vec3};

use crate::constants::{
    CAMERA_FOV_DEGREES, CAMERA_PITCH, CAMERA_POSITION, GROUND_HEIGHT, GROUND_SIZE,
};
use crate::registry::RobotRegistry;
use crate::robot::{Millis, RobotId};
use crate::settings::GameSettings;

/// What a ray struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    /// A robot's pick volume.
    Robot(RobotId),
    /// Ground or other static geometry.
    Scenery,
}

/// One intersection along a pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The object hit.
    pub target: PickTarget,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Resolves a point in normalised device coordinates to scene hits.
#[cfg_attr(test, mockall::automock)]
pub trait Raycaster {
    /// Returns every hit under `ndc`, in any order.
    fn cast(&self, ndc: Vec2) -> Vec<RayHit>;
}

/// Hits captured earlier, replayed for any query point.
///
/// Lets a caller cast against a borrowed scene and then mutate that scene
/// while dispatching the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedHits(pub Vec<RayHit>);

impl Raycaster for CapturedHits {
    fn cast(&self, _ndc: Vec2) -> Vec<RayHit> {
        self.0.clone()
    }
}

/// Maps a pointer position in pixels to normalised device coordinates.
///
/// `x` grows rightwards and `y` downwards from the top-left corner; the
/// result has `+y` up and spans `[-1, 1]` on both axes. Returns `None` for
/// an empty viewport.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use whackabot::picking::normalize_pointer;
///
/// assert_eq!(normalize_pointer(400.0, 300.0, 800.0, 600.0), Some(Vec2::ZERO));
/// assert_eq!(normalize_pointer(0.0, 0.0, 800.0, 600.0), Some(Vec2::new(-1.0, 1.0)));
/// assert_eq!(normalize_pointer(1.0, 1.0, 0.0, 600.0), None);
/// ```
#[must_use]
pub fn normalize_pointer(x: f32, y: f32, width: f32, height: f32) -> Option<Vec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Vec2::new(x / width * 2.0 - 1.0, -(y / height * 2.0 - 1.0)))
}

/// Half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Distance to the nearest intersection with a sphere, if any.
    #[must_use]
    pub fn hit_sphere(&self, centre: Vec3, radius: f32) -> Option<f32> {
        let offset = self.origin - centre;
        let b = offset.dot(self.direction);
        let c = offset.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        [-b - root, -b + root].into_iter().find(|&t| t >= 0.0)
    }

    /// Distance to a horizontal square centred on the y axis, if any.
    #[must_use]
    pub fn hit_ground(&self, height: f32, size: f32) -> Option<f32> {
        if self.direction.y.abs() <= f32::EPSILON {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        if t < 0.0 {
            return None;
        }
        let point = self.origin + self.direction * t;
        let half = size / 2.0;
        (point.x.abs() <= half && point.z.abs() <= half).then_some(t)
    }
}

/// Perspective camera used to turn screen points into rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Eye position.
    pub position: Vec3,
    /// Orientation; the camera looks down its local `-z`.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width over height.
    pub aspect: f32,
}

impl CameraRig {
    /// The stock camera for a viewport of the given aspect ratio.
    #[must_use]
    pub fn for_aspect(aspect: f32) -> Self {
        Self {
            position: Vec3::from_array(CAMERA_POSITION),
            rotation: Quat::from_rotation_x(CAMERA_PITCH),
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
            aspect,
        }
    }

    fn half_extent(&self) -> Vec2 {
        let half_height = (self.fov_y / 2.0).tan();
        Vec2::new(half_height * self.aspect, half_height)
    }

    /// World-space ray through `ndc`.
    #[must_use]
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let extent = self.half_extent();
        let local = Vec3::new(ndc.x * extent.x, ndc.y * extent.y, -1.0);
        Ray {
            origin: self.position,
            direction: (self.rotation * local).normalize(),
        }
    }

    /// Normalised device coordinates of a world point in front of the camera.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let local = self.rotation.inverse() * (point - self.position);
        if local.z >= 0.0 {
            return None;
        }
        let extent = self.half_extent();
        let depth = -local.z;
        Some(Vec2::new(
            local.x / depth / extent.x,
            local.y / depth / extent.y,
        ))
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::for_aspect(1.0)
    }
}

/// Pick volume dimensions for robots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitVolume {
    /// Sphere radius.
    pub radius: f32,
    /// Height of the sphere centre above the robot origin.
    pub height: f32,
}

impl From<&GameSettings> for HitVolume {
    fn from(settings: &GameSettings) -> Self {
        Self {
            radius: settings.hit_radius,
            height: settings.hit_height,
        }
    }
}

/// [`Raycaster`] over the stock scene as it stands at one instant.
#[derive(Debug)]
pub struct SceneRaycaster<'a> {
    rig: CameraRig,
    volume: HitVolume,
    registry: &'a RobotRegistry,
    now: Millis,
}

impl<'a> SceneRaycaster<'a> {
    /// Snapshot of `registry` posed at `now`, seen through `rig`.
    #[must_use]
    pub const fn new(
        rig: CameraRig,
        volume: HitVolume,
        registry: &'a RobotRegistry,
        now: Millis,
    ) -> Self {
        Self {
            rig,
            volume,
            registry,
            now,
        }
    }
}

impl Raycaster for SceneRaycaster<'_> {
    fn cast(&self, ndc: Vec2) -> Vec<RayHit> {
        let ray = self.rig.ray(ndc);
        let mut hits: Vec<RayHit> = self
            .registry
            .robots()
            .into_iter()
            .filter(|robot| robot.state().is_visible())
            .filter_map(|robot| {
                let centre = robot.pose(self.now).translation + Vec3::Y * self.volume.height;
                ray.hit_sphere(centre, self.volume.radius)
                    .map(|distance| RayHit {
                        target: PickTarget::Robot(robot.id()),
                        distance,
                    })
            })
            .collect();
        if let Some(distance) = ray.hit_ground(GROUND_HEIGHT, GROUND_SIZE) {
            hits.push(RayHit {
                target: PickTarget::Scenery,
                distance,
            });
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
