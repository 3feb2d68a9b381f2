//! Projectiles — шары, которые игрок бросает из позиции камеры
//!
//! Lifecycle:
//! 1. Tap в Playing → `spawn_projectile` (dynamic body + один impulse)
//! 2. Rapier симулирует полёт и столкновения
//! 3. `despawn_expired_projectiles` удаляет шар ровно через lifetime
//!
//! Lifetime считается по виртуальному времени (`Time::elapsed`), тот же
//! timeline, что и у остальных систем. Отмены удаления нет.

use std::time::Duration;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    ActiveEvents, Collider, ColliderMassProperties, CollisionEvent, CollisionGroups, ExternalImpulse,
    RigidBody,
};

use crate::config::GameConfig;
use crate::scene::collision;

/// Снаряд
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub radius: f32,
    /// `Time::elapsed` в момент spawn'а
    pub spawned_at: Duration,
}

/// Компонент: удалить entity когда `Time::elapsed >= despawn_at`
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub despawn_at: Duration,
}

/// Event: снаряд запущен
#[derive(Event, Debug, Clone)]
pub struct ProjectileLaunched {
    pub projectile: Entity,
    pub position: Vec3,
    pub impulse: Vec3,
}

/// Event: снаряд удалён по таймауту
#[derive(Event, Debug, Clone)]
pub struct ProjectileExpired {
    pub projectile: Entity,
}

/// Event: снаряд коснулся тела из contact-test mask
#[derive(Event, Debug, Clone)]
pub struct ProjectileContact {
    pub projectile: Entity,
    pub other: Entity,
}

/// Launch вектор: forward basis позы (третий столбец), со знаком минус,
/// покомпонентно умноженный на `scale`.
///
/// Камера смотрит вдоль -Z, поэтому `-z_axis` — направление взгляда.
pub fn launch_impulse(camera_transform: &Mat4, scale: Vec3) -> Vec3 {
    -camera_transform.z_axis.truncate() * scale
}

/// Точка запуска = translation позы
pub fn launch_origin(camera_transform: &Mat4) -> Vec3 {
    camera_transform.w_axis.truncate()
}

/// Spawn снаряда из позы камеры
///
/// Возвращает entity и приложенный impulse.
pub fn spawn_projectile(
    commands: &mut Commands,
    camera_transform: &Mat4,
    config: &GameConfig,
    now: Duration,
) -> (Entity, Vec3) {
    let position = launch_origin(camera_transform);
    let impulse = launch_impulse(camera_transform, config.launch_scale());

    let entity = commands
        .spawn((
            Name::new("projectile"),
            Projectile {
                radius: config.projectile_radius,
                spawned_at: now,
            },
            DespawnAfter {
                despawn_at: now + config.projectile_lifetime(),
            },
            Transform::from_translation(position),
            // Rapier physics
            RigidBody::Dynamic,
            Collider::ball(config.projectile_radius),
            ColliderMassProperties::Mass(config.projectile_mass),
            collision::projectile_groups(),
            ActiveEvents::COLLISION_EVENTS,
            // Rapier сбрасывает impulse после первого шага
            ExternalImpulse {
                impulse,
                torque_impulse: Vec3::ZERO,
            },
        ))
        .id();

    (entity, impulse)
}

/// Система: удаление снарядов с истёкшим lifetime
pub fn despawn_expired_projectiles(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter), With<Projectile>>,
    time: Res<Time>,
    mut expired_events: EventWriter<ProjectileExpired>,
    mut stats: ResMut<crate::GameStats>,
) {
    let now = time.elapsed();

    for (entity, despawn_after) in query.iter() {
        if now >= despawn_after.despawn_at {
            commands.entity(entity).despawn();
            expired_events.write(ProjectileExpired { projectile: entity });
            stats.projectiles_expired += 1;
            crate::log(&format!("Projectile {:?} expired", entity));
        }
    }
}

/// Система: Rapier CollisionEvent → ProjectileContact
///
/// Репортим только контакты с телами, чья category пересекается с
/// contact-test mask снаряда.
pub fn detect_projectile_contacts(
    mut collisions: EventReader<CollisionEvent>,
    projectiles: Query<(), With<Projectile>>,
    groups: Query<&CollisionGroups>,
    mut contact_events: EventWriter<ProjectileContact>,
    mut stats: ResMut<crate::GameStats>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };

        // Оба порядка: (projectile, other) и (other, projectile)
        for (projectile, other) in [(a, b), (b, a)] {
            if projectiles.get(projectile).is_err() {
                continue;
            }
            let Ok(other_groups) = groups.get(other) else {
                continue;
            };
            if !collision::reports_contact(other_groups.memberships) {
                continue;
            }

            contact_events.write(ProjectileContact { projectile, other });
            stats.projectile_contacts += 1;
            crate::log(&format!("Projectile {:?} hit {:?}", projectile, other));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_along_negative_z() {
        // Forward basis (0, 0, -1) → impulse (0, 0, 5)
        let camera = Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::NEG_Z, Vec4::W);
        let impulse = launch_impulse(&camera, Vec3::new(5.0, 10.0, 5.0));

        assert_eq!(impulse, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(launch_origin(&camera), Vec3::ZERO);
    }

    #[test]
    fn test_identity_pose_launches_forward() {
        // Identity: z_axis = +Z, камера смотрит в -Z
        let impulse = launch_impulse(&Mat4::IDENTITY, Vec3::new(5.0, 10.0, 5.0));
        assert_eq!(impulse, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_vertical_component_scaled_double() {
        // Камера наклонена вниз на 45°: forward basis имеет y и z компоненты
        let camera = Mat4::from_rotation_translation(
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4),
            Vec3::new(0.0, 1.5, 0.0),
        );
        let impulse = launch_impulse(&camera, Vec3::new(5.0, 10.0, 5.0));
        let forward = -camera.z_axis.truncate();

        assert!((impulse.y - forward.y * 10.0).abs() < 1e-5);
        assert!((impulse.z - forward.z * 5.0).abs() < 1e-5);
        assert_eq!(launch_origin(&camera), Vec3::new(0.0, 1.5, 0.0));
    }
}
