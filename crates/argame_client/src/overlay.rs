use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use argame_simulation::{
    ArBackend, ArGameSet, GameStarted, GameStats, GameState, ProjectileExpired,
    ProjectileLaunched, SimulatedArSession, StatisticsOverlay,
};

/// Statistics overlay: FPS, frame time, фаза игры, снаряды, последнее событие
pub struct StatisticsOverlayPlugin;

impl Plugin for StatisticsOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .init_resource::<LastGameEvent>()
            .add_systems(
                Update,
                (
                    record_game_events,
                    toggle_statistics_text,
                    update_statistics_text,
                )
                    .chain()
                    .after(ArGameSet),
            );
    }
}

/// Последнее игровое событие (строка для overlay)
#[derive(Resource, Default)]
struct LastGameEvent(String);

#[derive(Component)]
struct StatisticsText;

/// Spawn/despawn текста по StatisticsOverlay (включается при активации)
fn toggle_statistics_text(
    mut commands: Commands,
    overlay: Res<StatisticsOverlay>,
    existing: Query<Entity, With<StatisticsText>>,
) {
    if !overlay.is_changed() {
        return;
    }

    match (overlay.visible, existing.iter().next()) {
        (true, None) => {
            commands.spawn((
                StatisticsText,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(8.0),
                    left: Val::Px(8.0),
                    ..default()
                },
            ));
        }
        (false, Some(entity)) => {
            commands.entity(entity).despawn();
        }
        _ => {}
    }
}

fn record_game_events(
    mut started: EventReader<GameStarted>,
    mut launched: EventReader<ProjectileLaunched>,
    mut expired: EventReader<ProjectileExpired>,
    mut last: ResMut<LastGameEvent>,
) {
    for event in started.read() {
        last.0 = format!("scene placed at {:.2}", event.position);
    }
    for event in launched.read() {
        last.0 = format!("launched {:?}, impulse {:.1}", event.projectile, event.impulse);
    }
    for event in expired.read() {
        last.0 = format!("expired {:?}", event.projectile);
    }
}

fn update_statistics_text(
    mut query: Query<&mut Text, With<StatisticsText>>,
    diagnostics: Res<DiagnosticsStore>,
    state: Res<GameState>,
    stats: Res<GameStats>,
    session: Res<SimulatedArSession>,
    last: Res<LastGameEvent>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    let tracking_time = session.current_frame().map_or(0.0, |frame| frame.timestamp);

    text.0 = format!(
        "{:.0} fps  {:.1} ms  tracking {:.1} s\n{:?}\nprojectiles: {} alive / {} launched, {} hits\n{}",
        fps,
        frame_time,
        tracking_time,
        state.phase(),
        stats.projectiles_alive(),
        stats.projectiles_launched,
        stats.projectile_contacts,
        last.0,
    );
}
