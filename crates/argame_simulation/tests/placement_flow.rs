//! Placement integration test
//!
//! Проверяем:
//! - маркер следует за hit-test результатом каждый кадр
//! - tap до поверхности ничего не меняет
//! - commit переносит container в точку маркера и открывает его один раз
//! - Playing — терминальное состояние
//! - удалённый извне маркер не блокирует игру

mod common;

use argame_simulation::*;
use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;
use common::*;

#[test]
fn test_marker_tracks_first_hit_result() {
    let mut app = create_test_app();
    let first = Vec3::new(0.2, 0.0, -1.0);
    let further = Vec3::new(0.4, 0.0, -3.0);

    session(&mut app).set_scripted_hits(vec![
        HitTestResult::from_position(first, 1.0),
        HitTestResult::from_position(further, 3.0),
    ]);
    activate(&mut app);

    assert_eq!(state(&app).phase(), GamePhase::AwaitingCommit);
    let found = markers(&mut app);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].1, first);

    // Устройство сдвинулось — маркер едет за поверхностью
    let moved = Vec3::new(-0.3, 0.05, -1.2);
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(moved, 1.2)]);
    app.update();

    let found = markers(&mut app);
    assert_eq!(found.len(), 1, "marker must not be duplicated");
    assert_eq!(found[0].1, moved);
    assert_eq!(state(&app).marker(), Some(found[0].0));
}

#[test]
fn test_no_hit_keeps_last_marker_position() {
    let mut app = create_test_app();
    let position = Vec3::new(0.0, 0.0, -1.0);

    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(position, 1.0)]);
    activate(&mut app);

    session(&mut app).set_surface_detected(false);
    for _ in 0..5 {
        app.update();
    }

    assert_eq!(state(&app).phase(), GamePhase::AwaitingCommit);
    assert_eq!(markers(&mut app)[0].1, position);
}

#[test]
fn test_marker_from_floor_raycast() {
    let mut app = create_test_app();

    // Камера на 1.5m смотрит прямо вниз: центр экрана → (1, 0, -2)
    let camera = Transform::from_xyz(1.0, 1.5, -2.0).looking_to(Vec3::NEG_Y, Vec3::NEG_Z);
    session(&mut app).set_camera_transform(Some(camera.compute_matrix()));
    activate(&mut app);

    let found = markers(&mut app);
    assert_eq!(found.len(), 1);
    assert!(
        found[0].1.distance(Vec3::new(1.0, 0.0, -2.0)) < 1e-4,
        "marker at {:?}",
        found[0].1
    );
}

#[test]
fn test_tap_before_surface_is_ignored() {
    let mut app = create_test_app();
    session(&mut app).set_surface_detected(false);
    activate(&mut app);

    tap(&mut app);
    app.update();
    tap(&mut app);
    app.update();

    assert_eq!(state(&app), GameState::AwaitingSurface);
    assert!(markers(&mut app).is_empty());
    let (_, visibility) = container(&mut app);
    assert_eq!(visibility, ContainerVisibility::Hidden);
    assert_eq!(stats(&app).commits, 0);
}

#[test]
fn test_commit_places_container_at_marker() {
    let mut app = create_test_app();
    let position = Vec3::new(0.25, -0.8, -1.4);

    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(position, 1.0)]);
    activate(&mut app);

    let (_, visibility) = container(&mut app);
    assert_eq!(visibility, ContainerVisibility::Hidden, "hidden before commit");

    tap(&mut app);
    app.update();

    assert!(state(&app).is_playing());
    let (container_position, visibility) = container(&mut app);
    assert_eq!(container_position, position);
    assert_eq!(visibility, ContainerVisibility::Visible);
    assert!(markers(&mut app).is_empty(), "marker destroyed on commit");
    assert_eq!(stats(&app).commits, 1);

    let started = drain_events::<GameStarted>(&mut app);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].position, position);
    assert_eq!(
        started[0].container,
        app.world().resource::<SceneHandles>().container
    );
}

#[test]
fn test_commit_uses_last_marker_position() {
    let mut app = create_test_app();
    let first = Vec3::new(1.0, 0.0, 0.0);
    let last = Vec3::new(-2.0, 0.1, 3.0);

    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(first, 1.0)]);
    activate(&mut app);
    assert_eq!(markers(&mut app)[0].1, first);

    // Поверхность сдвинулась в том же кадре, что и tap
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(last, 1.0)]);
    tap(&mut app);
    app.update();

    assert!(state(&app).is_playing());
    let (container_position, visibility) = container(&mut app);
    assert_eq!(container_position, last);
    assert_eq!(visibility, ContainerVisibility::Visible);
    assert!(markers(&mut app).is_empty());
}

#[test]
fn test_despawned_marker_is_recreated() {
    let mut app = create_test_app();
    let position = Vec3::new(0.0, 0.0, -1.0);
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(position, 1.0)]);
    activate(&mut app);

    let Some(lost) = state(&app).marker() else {
        panic!("marker should exist after surface found");
    };
    app.world_mut().despawn(lost);
    for _ in 0..3 {
        app.update();
    }

    let found = markers(&mut app);
    assert_eq!(found.len(), 1, "marker respawned");
    assert_ne!(found[0].0, lost);
    assert_eq!(found[0].1, position);
    assert_eq!(state(&app).marker(), Some(found[0].0));

    tap(&mut app);
    app.update();
    assert!(state(&app).is_playing(), "game can still start");
    assert_eq!(container(&mut app).0, position);
}

#[test]
fn test_despawned_marker_without_surface_waits() {
    let mut app = create_test_app();
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(Vec3::ZERO, 1.0)]);
    activate(&mut app);

    let Some(lost) = state(&app).marker() else {
        panic!("marker should exist after surface found");
    };
    app.world_mut().despawn(lost);
    session(&mut app).set_surface_detected(false);
    tap(&mut app);
    app.update();

    assert_eq!(state(&app), GameState::AwaitingSurface);
    assert!(markers(&mut app).is_empty());
    assert_eq!(stats(&app).commits, 0);

    session(&mut app).set_surface_detected(true);
    app.update();
    assert_eq!(state(&app).phase(), GamePhase::AwaitingCommit);
    assert_eq!(markers(&mut app).len(), 1);
}

#[test]
fn test_playing_is_terminal() {
    let mut app = create_test_app();
    let position = Vec3::new(0.0, 0.0, -1.0);
    place_scene_at(&mut app, position);
    let playing = state(&app);

    // Поверхность продолжает находиться, tap'ы продолжаются
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(Vec3::ONE, 1.0)]);
    for _ in 0..3 {
        tap(&mut app);
        app.update();
    }

    assert_eq!(state(&app), playing);
    assert!(markers(&mut app).is_empty(), "no marker while playing");
    let (container_position, visibility) = container(&mut app);
    assert_eq!(container_position, position, "container never moves again");
    assert_eq!(visibility, ContainerVisibility::Visible);
    assert_eq!(stats(&app).commits, 1);
}

#[test]
fn test_scene_physics_enabled_after_commit() {
    let mut app = create_test_app();
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(Vec3::ZERO, 1.0)]);
    activate(&mut app);

    let mut with_bodies = app
        .world_mut()
        .query_filtered::<(), (With<SceneBody>, With<RigidBody>)>();
    assert_eq!(with_bodies.iter(app.world()).count(), 0);

    tap(&mut app);
    app.update();
    app.update();

    let mut scene_bodies = app.world_mut().query::<&SceneBody>();
    let total = scene_bodies.iter(app.world()).count();
    assert!(total > 0);
    assert_eq!(with_bodies.iter(app.world()).count(), total);
}

#[test]
fn test_deactivation_pauses_without_teardown() {
    let mut app = create_test_app();
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(Vec3::ZERO, 1.0)]);
    activate(&mut app);
    let marker = state(&app).marker();

    app.world_mut().send_event(ViewDeactivated);
    app.update();

    assert_eq!(session(&mut app).status(), SessionStatus::Paused);
    assert_eq!(state(&app).marker(), marker, "game state survives pause");
    assert_eq!(markers(&mut app).len(), 1);

    // Повторная активация: сессия снова running, сцена не грузится второй раз
    activate(&mut app);
    assert_eq!(session(&mut app).status(), SessionStatus::Running);
    let mut containers = app.world_mut().query::<&SceneContainer>();
    assert_eq!(containers.iter(app.world()).count(), 1);
}

#[test]
fn test_session_hooks_do_not_change_state() {
    let mut app = create_test_app();
    session(&mut app).set_scripted_hits(vec![HitTestResult::from_position(Vec3::ZERO, 1.0)]);
    activate(&mut app);
    let before = state(&app);

    app.world_mut().send_event(SessionFailed {
        reason: "camera unavailable".to_string(),
    });
    app.world_mut().send_event(SessionInterrupted);
    app.world_mut().send_event(SessionInterruptionEnded);
    app.update();

    assert_eq!(state(&app), before);
    assert_eq!(session(&mut app).status(), SessionStatus::Running);
}
