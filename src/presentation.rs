//! Windowed 3D presentation of the play field.
//!
//! `PresentationPlugin` owns the camera, lights, ground and robot models and
//! translates mouse and keyboard input into session requests. It remains a
//! passive observer of game state: robot transforms and visibility are copied
//! from the mirror components maintained by [`crate::WhackPlugin`].

use bevy::animation::graph::{AnimationGraphHandle, AnimationNodeIndex};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{
    CAMERA_FOV_DEGREES, CAMERA_PITCH, CAMERA_POSITION, GROUND_HEIGHT, GROUND_SIZE, ROBOT_SCALE,
};
use crate::hud::HudText;
use crate::plugin::{
    sync_robot_entities_system, PlayRequested, PointerClick, ResetRequested, RobotPose, RobotTag,
    RobotVisible,
};

/// Asset path of the robot model.
pub const ROBOT_MODEL_PATH: &str = "models/robot.glb";

/// Marker component for the presentation camera.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct GameCamera;

/// Robot scene shared by every robot.
#[derive(Resource, Debug, Clone)]
pub struct RobotModel(pub Handle<Scene>);

/// First animation clip of the robot model, looped on every robot.
#[derive(Resource, Debug, Clone)]
pub struct RobotAnimation {
    /// Graph holding the single clip.
    pub graph: Handle<AnimationGraph>,
    /// Node of the clip within `graph`.
    pub node: AnimationNodeIndex,
}

fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: 1.0,
            far: 10_000.0,
            ..default()
        }),
        Transform::from_translation(Vec3::from_array(CAMERA_POSITION))
            .with_rotation(Quat::from_rotation_x(CAMERA_PITCH)),
        GameCamera,
        Name::new("GameCamera"),
    ));

    commands.spawn((
        SpotLight {
            color: Color::WHITE,
            intensity: 40_000_000.0,
            range: 200.0,
            shadows_enabled: true,
            outer_angle: 45_f32.to_radians(),
            ..default()
        },
        Transform::from_translation(Vec3::from_array(CAMERA_POSITION))
            .looking_at(Vec3::new(-2.0, 0.0, -2.0), Vec3::Y),
        Name::new("SpotLight"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 1_500.0,
            ..default()
        },
        Transform::from_xyz(0.0, 100.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
        Name::new("FillLight"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.85, 0.85),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_HEIGHT, 0.0),
        Name::new("Ground"),
    ));

    commands.insert_resource(RobotModel(
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(ROBOT_MODEL_PATH)),
    ));

    let (graph, node) = AnimationGraph::from_clip(
        asset_server.load(GltfAssetLabel::Animation(0).from_asset(ROBOT_MODEL_PATH)),
    );
    commands.insert_resource(RobotAnimation {
        graph: graphs.add(graph),
        node,
    });
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn attach_robot_models(
    mut commands: Commands,
    model: Res<RobotModel>,
    added: Query<Entity, Added<RobotTag>>,
) {
    for entity in &added {
        commands.entity(entity).insert((
            SceneRoot(model.0.clone()),
            Transform::from_scale(Vec3::splat(ROBOT_SCALE)),
            Visibility::Hidden,
        ));
    }
}

/// Loops the model's clip on each animation player a robot scene spawns.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn start_robot_animations_system(
    mut commands: Commands,
    animation: Res<RobotAnimation>,
    mut players: Query<(Entity, &mut AnimationPlayer), Added<AnimationPlayer>>,
) {
    for (entity, mut player) in &mut players {
        player.play(animation.node).repeat();
        commands
            .entity(entity)
            .insert(AnimationGraphHandle(animation.graph.clone()));
    }
}

/// Copies mirrored robot state onto transforms and visibility.
pub fn apply_robot_poses_system(
    mut robots: Query<(&RobotPose, &RobotVisible, &mut Transform, &mut Visibility)>,
) {
    for (pose, visible, mut transform, mut visibility) in &mut robots {
        transform.translation = pose.0.translation;
        transform.rotation = Quat::from_rotation_x(pose.0.pitch);
        *visibility = if visible.0 {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

/// Forwards left clicks inside the primary window as [`PointerClick`]s.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn mouse_click_system(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    commands.trigger(PointerClick {
        x: cursor.x,
        y: cursor.y,
        width: window.width(),
        height: window.height(),
    });
}

/// Space starts play, R resets the round.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn keyboard_controls_system(mut commands: Commands, keyboard: Res<ButtonInput<KeyCode>>) {
    if keyboard.just_pressed(KeyCode::Space) {
        commands.trigger(PlayRequested);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        commands.trigger(ResetRequested);
    }
}

/// Shows the HUD labels in the window title.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn hud_title_system(hud: Res<HudText>, mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    if !hud.is_changed() {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    window.title = if hud.controls.play {
        "Whackabot - press Space to play".to_owned()
    } else {
        format!("Whackabot - {} - {} - R to reset", hud.score, hud.time)
    };
}

/// Plugin owning the camera, scene and input for the windowed game.
#[derive(Debug)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GameCamera>();
        app.add_systems(Startup, setup_scene);
        app.add_systems(
            Update,
            (mouse_click_system, keyboard_controls_system).before(sync_robot_entities_system),
        );
        app.add_systems(
            Update,
            (attach_robot_models, apply_robot_poses_system)
                .chain()
                .after(sync_robot_entities_system),
        );
        app.add_systems(
            Update,
            start_robot_animations_system.run_if(resource_exists::<RobotAnimation>),
        );
        app.add_systems(PostUpdate, hud_title_system);
    }
}
