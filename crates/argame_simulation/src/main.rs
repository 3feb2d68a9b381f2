//! Headless симуляция ARGame
//!
//! Скриптованная сессия: поиск поверхности → commit → серия бросков →
//! ожидание таймаута снарядов. Запускает Bevy App без рендера.

use std::time::Duration;

use argame_simulation::{
    create_headless_app, ArBackend, GameState, GameStats, ScreenTapped, SceneLight,
    SimulatedArSession, ViewActivated,
};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

const TICK: Duration = Duration::from_millis(100);

fn main() {
    let seed = 42;
    println!("Starting ARGame headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    // Устройство в 1.5m над полом, наклонено вниз на 45°
    let camera = Transform::from_xyz(0.0, 1.5, 1.5).looking_at(Vec3::ZERO, Vec3::Y);
    app.world_mut()
        .resource_mut::<SimulatedArSession>()
        .set_camera_transform(Some(camera.compute_matrix()));

    app.world_mut().send_event(ViewActivated);

    for tick in 0..200 {
        // Tap на 1 сек (commit), потом бросок каждую секунду до 5 сек
        if tick % 10 == 0 && (10..=50).contains(&tick) {
            let center = app.world().resource::<SimulatedArSession>().viewport_center();
            app.world_mut().send_event(ScreenTapped { position: center });
        }

        app.update();

        if tick % 20 == 0 {
            let state = *app.world().resource::<GameState>();
            let stats = *app.world().resource::<GameStats>();
            println!(
                "Tick {}: {:?}, projectiles alive {}, launched {}",
                tick,
                state.phase(),
                stats.projectiles_alive(),
                stats.projectiles_launched
            );
        }
    }

    let stats = *app.world().resource::<GameStats>();
    let mut lights = app.world_mut().query::<&SceneLight>();
    for light in lights.iter(app.world()) {
        println!("Directional light intensity: {:.1}", light.intensity);
    }

    println!(
        "Simulation complete: {} launched, {} expired",
        stats.projectiles_launched, stats.projectiles_expired
    );
}
