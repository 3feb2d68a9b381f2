use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use argame_simulation::{ArGameSet, SimulatedArSession};

/// Desktop "устройство": камера = device pose для SimulatedArSession
pub struct DeviceCameraPlugin;

impl Plugin for DeviceCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (device_camera_controls, publish_device_pose)
                .chain()
                .before(ArGameSet),
        );
    }
}

#[derive(Component)]
pub struct DeviceCamera {
    pub yaw: f32,   // Horizontal rotation (radians)
    pub pitch: f32, // Vertical rotation (radians)
    pub move_speed: f32,
    pub sensitivity: f32,
}

impl Default for DeviceCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: -std::f32::consts::FRAC_PI_4, // Смотрим на пол под 45°
            move_speed: 1.5,                     // Человек с телефоном, не машина
            sensitivity: 0.003,
        }
    }
}

/// WASD — ходим, Q/E — вниз/вверх, правая кнопка мыши — поворот
fn device_camera_controls(
    mut query: Query<(&mut DeviceCamera, &mut Transform)>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    time: Res<Time>,
) {
    let Ok((mut camera, mut transform)) = query.single_mut() else {
        return;
    };

    if mouse_buttons.pressed(MouseButton::Right) {
        for motion in mouse_motion.read() {
            camera.yaw -= motion.delta.x * camera.sensitivity;
            camera.pitch -= motion.delta.y * camera.sensitivity;

            // Clamp pitch to avoid gimbal lock
            camera.pitch = camera.pitch.clamp(
                -std::f32::consts::FRAC_PI_2 + 0.1,
                std::f32::consts::FRAC_PI_2 - 0.1,
            );
        }
    } else {
        // Consume motion events even when not rotating
        mouse_motion.clear();
    }

    transform.rotation = Quat::from_euler(EulerRot::YXZ, camera.yaw, camera.pitch, 0.0);

    // Движение в горизонтальной плоскости (как человек с устройством)
    let forward = Vec3::new(-camera.yaw.sin(), 0.0, -camera.yaw.cos());
    let right = Vec3::new(camera.yaw.cos(), 0.0, -camera.yaw.sin());
    let mut direction = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keys.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keys.pressed(KeyCode::KeyD) {
        direction += right;
    }
    if keys.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if keys.pressed(KeyCode::KeyE) {
        direction += Vec3::Y;
    }
    if keys.pressed(KeyCode::KeyQ) {
        direction -= Vec3::Y;
    }

    if direction.length_squared() > 0.0 {
        transform.translation += direction.normalize() * camera.move_speed * time.delta_secs();
    }
}

/// Поза камеры и размер окна → SimulatedArSession
fn publish_device_pose(
    query: Query<&Transform, With<DeviceCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<SimulatedArSession>,
) {
    if let Ok(window) = windows.single() {
        session.set_viewport_size(Vec2::new(window.width(), window.height()));
    }

    let pose = query.single().ok().map(|transform| transform.compute_matrix());
    session.set_camera_transform(pose);
}
