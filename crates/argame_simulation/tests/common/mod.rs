//! Общие helper'ы для headless тестов

#![allow(dead_code)]

use std::time::Duration;

use argame_simulation::*;
use bevy::ecs::event::Events;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

/// Шаг виртуального времени на один app.update()
pub const TICK: Duration = Duration::from_millis(100);

/// Headless App без шума light estimate и с ручным временем
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulatedSessionPlugin {
            config: SimulatedSessionConfig {
                ambient_noise: 0.0,
                ..default()
            },
        })
        .add_plugins(ArGamePlugin::<SimulatedArSession>::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK));
    app
}

pub fn session(app: &mut App) -> Mut<'_, SimulatedArSession> {
    app.world_mut().resource_mut::<SimulatedArSession>()
}

pub fn state(app: &App) -> GameState {
    *app.world().resource::<GameState>()
}

pub fn stats(app: &App) -> GameStats {
    *app.world().resource::<GameStats>()
}

pub fn tap(app: &mut App) {
    app.world_mut().send_event(ScreenTapped {
        position: Vec2::new(640.0, 360.0),
    });
}

/// Активация экрана + один кадр (сцена загружена, сессия running)
pub fn activate(app: &mut App) {
    app.world_mut().send_event(ViewActivated);
    app.update();
}

/// Поверхность найдена в `position`, затем commit tap
pub fn place_scene_at(app: &mut App, position: Vec3) {
    session(app).set_scripted_hits(vec![HitTestResult::from_position(position, 1.0)]);
    activate(app);
    tap(app);
    app.update();
    assert!(state(app).is_playing(), "scene should be placed");
}

pub fn markers(app: &mut App) -> Vec<(Entity, Vec3)> {
    let mut query = app
        .world_mut()
        .query_filtered::<(Entity, &Transform), With<PlacementMarker>>();
    query
        .iter(app.world())
        .map(|(entity, transform)| (entity, transform.translation))
        .collect()
}

pub fn container(app: &mut App) -> (Vec3, ContainerVisibility) {
    let mut query = app
        .world_mut()
        .query_filtered::<(&Transform, &ContainerVisibility), With<SceneContainer>>();
    let containers: Vec<_> = query
        .iter(app.world())
        .map(|(transform, visibility)| (transform.translation, *visibility))
        .collect();
    assert_eq!(containers.len(), 1, "exactly one scene container");
    containers[0]
}

pub fn projectiles(app: &mut App) -> Vec<(Entity, Projectile, Vec3)> {
    let mut query = app.world_mut().query::<(Entity, &Projectile, &Transform)>();
    query
        .iter(app.world())
        .map(|(entity, projectile, transform)| (entity, *projectile, transform.translation))
        .collect()
}

/// Все буферизованные события типа `E` (буфер очищается)
pub fn drain_events<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}
