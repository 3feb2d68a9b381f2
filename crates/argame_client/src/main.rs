use bevy::prelude::*;
use bevy_rapier3d::prelude::{NoUserData, RapierPhysicsPlugin};

use argame_simulation::{
    ArGamePlugin, GameConfig, SimulatedArSession, SimulatedSessionConfig, SimulatedSessionPlugin,
};

mod camera;
mod input;
mod logger;
mod overlay;
mod rendering;

use camera::{DeviceCamera, DeviceCameraPlugin};
use input::TapInputPlugin;
use overlay::StatisticsOverlayPlugin;
use rendering::RenderingSyncPlugin;

/// Опциональный конфиг рядом с бинарником
const CONFIG_PATH: &str = "argame.json";

fn main() {
    argame_simulation::set_logger(Box::new(logger::BevyLogger));

    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "ARGame".to_string(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics (projectiles, floor, blocks)
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .insert_resource(load_game_config())
        // AR platform stand-in: fov = Bevy default perspective fov
        .add_plugins(SimulatedSessionPlugin {
            config: SimulatedSessionConfig {
                vertical_fov: std::f32::consts::FRAC_PI_4,
                ..default()
            },
        })
        // Game logic (placement, projectiles, lighting)
        .add_plugins(ArGamePlugin::<SimulatedArSession>::default())
        // Client: visuals, device camera, input, statistics
        .add_plugins((
            RenderingSyncPlugin,
            DeviceCameraPlugin,
            TapInputPlugin,
            StatisticsOverlayPlugin,
        ))
        .add_systems(Startup, setup_environment)
        .run();
}

/// argame.json если есть, иначе defaults
fn load_game_config() -> GameConfig {
    let json = match std::fs::read_to_string(CONFIG_PATH) {
        Ok(json) => json,
        Err(_) => return GameConfig::default(),
    };

    match GameConfig::from_json_str(&json) {
        Ok(config) => {
            argame_simulation::log_info(&format!("Loaded {}", CONFIG_PATH));
            config
        }
        Err(err) => {
            argame_simulation::log_error(&format!("{}: {}, using defaults", CONFIG_PATH, err));
            GameConfig::default()
        }
    }
}

/// "Реальный мир": пол на y = 0 (его находит hit-test), камера-устройство
fn setup_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Room floor (визуал, без коллайдера)
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(10.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.25, 0.25, 0.27))),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        affects_lightmapped_meshes: false,
    });

    // Устройство на высоте глаз
    let device = DeviceCamera::default();
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.5, 1.0).with_rotation(Quat::from_euler(
            EulerRot::YXZ,
            device.yaw,
            device.pitch,
            0.0,
        )),
        device,
    ));
}
