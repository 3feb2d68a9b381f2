use bevy::prelude::*;

use argame_simulation::{
    ArGameSet, ContainerVisibility, GameConfig, PlacementMarker, Projectile, SceneBody,
    SceneBodyKind, SceneContainer, SceneLight,
};

/// Визуал для simulation entities (меш/материал/свет вешаются на них же)
pub struct RenderingSyncPlugin;

impl Plugin for RenderingSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                attach_marker_visuals,
                attach_container_visibility,
                attach_scene_body_visuals,
                attach_scene_light,
                attach_projectile_visuals,
                sync_container_visibility,
                sync_light_intensity,
            )
                .chain()
                .after(ArGameSet),
        );
    }
}

/// "Tap to start": двусторонняя текстурированная плоскость
fn attach_marker_visuals(
    mut commands: Commands,
    query: Query<(Entity, &PlacementMarker), Added<PlacementMarker>>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, marker) in query.iter() {
        // Плоскость в XY; Transform маркера кладёт её горизонтально
        let mesh = meshes.add(Plane3d::new(Vec3::Z, Vec2::splat(marker.size * 0.5)));
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load("taptostart.png")),
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            unlit: true,
            ..default()
        });

        commands
            .entity(entity)
            .insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}

fn attach_container_visibility(
    mut commands: Commands,
    query: Query<(Entity, &ContainerVisibility), Added<SceneContainer>>,
) {
    for (entity, visibility) in query.iter() {
        commands.entity(entity).insert(to_visibility(*visibility));
    }
}

fn attach_scene_body_visuals(
    mut commands: Commands,
    query: Query<(Entity, &SceneBody), Added<SceneBody>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, body) in query.iter() {
        let size = body.half_extents * 2.0;
        let color = match body.kind {
            SceneBodyKind::Static => Color::srgb(0.35, 0.35, 0.4),
            SceneBodyKind::Dynamic => Color::srgb(0.9, 0.75, 0.3),
        };

        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(materials.add(color)),
        ));
    }
}

fn attach_scene_light(
    mut commands: Commands,
    query: Query<(Entity, &SceneLight), Added<SceneLight>>,
    config: Res<GameConfig>,
) {
    for (entity, light) in query.iter() {
        commands.entity(entity).insert(DirectionalLight {
            illuminance: light.intensity * config.light_illuminance_scale,
            shadows_enabled: true,
            ..default()
        });
    }
}

/// Красный светящийся шар
fn attach_projectile_visuals(
    mut commands: Commands,
    query: Query<(Entity, &Projectile), Added<Projectile>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, projectile) in query.iter() {
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0),
            emissive: LinearRgba::rgb(1.0, 0.0, 0.0),
            ..default()
        });

        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(projectile.radius))),
            MeshMaterial3d(material),
        ));
    }
}

fn sync_container_visibility(
    mut query: Query<(&ContainerVisibility, &mut Visibility), Changed<ContainerVisibility>>,
) {
    for (container_visibility, mut visibility) in query.iter_mut() {
        *visibility = to_visibility(*container_visibility);
    }
}

fn sync_light_intensity(
    mut query: Query<(&SceneLight, &mut DirectionalLight), Changed<SceneLight>>,
    config: Res<GameConfig>,
) {
    for (light, mut directional) in query.iter_mut() {
        directional.illuminance = light.intensity * config.light_illuminance_scale;
    }
}

fn to_visibility(visibility: ContainerVisibility) -> Visibility {
    match visibility {
        ContainerVisibility::Hidden => Visibility::Hidden,
        ContainerVisibility::Visible => Visibility::Visible,
    }
}
