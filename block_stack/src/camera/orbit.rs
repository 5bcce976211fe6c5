//! Orbit camera: drag to orbit, right-drag to pan, wheel to zoom, optional
//! auto-rotation about a fixed center.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::scene::{FrameStage, PointerCapture};

const POLAR_EPSILON: f32 = 1e-6;
const PIXELS_PER_LINE: f32 = 100.0;

/// Spins the camera about the vertical axis every frame when enabled.
#[derive(Resource, Clone, Debug)]
pub struct AutoRotate {
    pub enabled: bool,
    /// Radians per frame.
    pub speed: f32,
    pub center: Vec3,
}

impl Default for AutoRotate {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 0.001,
            center: Vec3::ZERO,
        }
    }
}

/// Orbit state attached to the camera. Input accumulates into pending
/// deltas; [`OrbitController::update`] applies them once per frame.
#[derive(Component, Clone, Debug)]
pub struct OrbitController {
    pub target: Vec3,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// World units per pixel of drag, per unit of distance to the target.
    pub pan_speed: f32,
    /// Radius factor per scroll line.
    pub zoom_speed: f32,
    /// Zoom limits; unbounded by default.
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    /// Keeps the camera above the ground plane.
    pub max_polar: f32,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    pan: Vec3,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            rotate_speed: 0.005,
            pan_speed: 0.0015,
            zoom_speed: 0.95,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: 0.0,
            max_polar: FRAC_PI_2 - 0.1,
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
            pan: Vec3::ZERO,
        }
    }
}

impl OrbitController {
    pub fn rotate(&mut self, drag: Vec2) {
        self.yaw -= drag.x * self.rotate_speed;
        self.pitch -= drag.y * self.rotate_speed;
    }

    /// Positive `lines` zoom in.
    pub fn zoom_by(&mut self, lines: f32) {
        self.zoom *= self.zoom_speed.powf(lines);
    }

    pub fn pan(&mut self, drag: Vec2, camera: &Transform) {
        let distance = camera.translation.distance(self.target);
        let right = *camera.right();
        let up = *camera.up();
        self.pan += (-right * drag.x + up * drag.y) * self.pan_speed * distance;
    }

    /// Applies pending input to `camera`, clamps, and re-aims it at the target.
    pub fn update(&mut self, camera: &mut Transform) {
        let offset = camera.translation - self.target;
        let radius = offset.length();
        let (theta, phi) = if radius > POLAR_EPSILON {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, FRAC_PI_2)
        };

        let theta = theta + self.yaw;
        let phi = (phi + self.pitch).clamp(
            self.min_polar.max(POLAR_EPSILON),
            self.max_polar.min(PI - POLAR_EPSILON),
        );
        let radius =
            (radius * self.zoom).clamp(self.min_distance.max(POLAR_EPSILON), self.max_distance);
        self.target += self.pan;

        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.translation = self.target + offset;
        camera.look_at(self.target, Vec3::Y);

        self.yaw = 0.0;
        self.pitch = 0.0;
        self.zoom = 1.0;
        self.pan = Vec3::ZERO;
    }
}

pub fn orbit_camera_plugin(app: &mut App) {
    app.init_resource::<AutoRotate>()
        .init_resource::<PointerCapture>()
        .add_systems(Startup, spawn_camera)
        .add_systems(Update, orbit_input_system.in_set(FrameStage::Input))
        .add_systems(
            Update,
            (auto_rotate_camera, orbit_update_system, sync_aspect_on_resize)
                .chain()
                .in_set(FrameStage::Camera),
        );
}

pub fn spawn_camera(mut commands: Commands) {
    let controller = OrbitController::default();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 1.0, 5.0).looking_at(controller.target, Vec3::Y),
        controller,
    ));
}

pub fn orbit_input_system(
    mouse: Res<ButtonInput<MouseButton>>,
    capture: Res<PointerCapture>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut cameras: Query<(&Transform, &mut OrbitController)>,
) {
    let drag: Vec2 = motion.read().map(|ev| ev.delta).sum();
    let scroll: f32 = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_LINE,
        })
        .sum();
    if capture.over_ui {
        return;
    }

    for (transform, mut controller) in &mut cameras {
        if mouse.pressed(MouseButton::Left) {
            controller.rotate(drag);
        } else if mouse.pressed(MouseButton::Right) {
            controller.pan(drag, transform);
        }
        if scroll != 0.0 {
            controller.zoom_by(scroll);
        }
    }
}

/// Rotates the camera position about +Y relative to the rig center.
/// The center is not added back afterwards; the orbit pass re-aims the camera.
pub fn auto_rotate_camera(
    rig: Res<AutoRotate>,
    mut cameras: Query<&mut Transform, With<OrbitController>>,
) {
    if !rig.enabled {
        return;
    }
    for mut transform in &mut cameras {
        transform.translation -= rig.center;
        transform.translation = Quat::from_rotation_y(rig.speed) * transform.translation;
    }
}

pub fn orbit_update_system(mut cameras: Query<(&mut Transform, &mut OrbitController)>) {
    for (mut transform, mut controller) in &mut cameras {
        controller.update(&mut transform);
    }
}

pub fn sync_aspect_on_resize(
    mut resized: EventReader<WindowResized>,
    mut cameras: Query<&mut Projection, With<OrbitController>>,
) {
    let Some(event) = resized.read().last() else {
        return;
    };
    if event.height <= 0.0 {
        return;
    }
    debug!("viewport resized to {}x{}", event.width, event.height);
    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = event.width / event.height;
        }
    }
}
