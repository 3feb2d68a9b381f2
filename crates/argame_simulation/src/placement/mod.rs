//! Placement state machine
//!
//! AwaitingSurface → AwaitingCommit → Playing (terminal)
//!
//! - Каждый кадр (не Playing): hit-test в центре экрана, маркер следует за
//!   поверхностью. Первый hit спавнит маркер и переводит в AwaitingCommit.
//! - Tap в AwaitingCommit: container переезжает на место маркера,
//!   становится видимым, маркер удаляется → Playing.
//! - Tap в Playing: снаряд из позы камеры.
//! - Tap в AwaitingSurface игнорируется.
//! - Маркер удалён извне → обратно в AwaitingSurface, следующий hit спавнит новый.
//!
//! Отсутствие hit / позы / handles — тихий early return, не ошибка.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::projectile::{spawn_projectile, ProjectileLaunched};
use crate::scene::{ContainerVisibility, SceneContainer, SceneHandles};
use crate::session::ArBackend;
use crate::GameStats;

/// Фаза игры (без данных) — для логов и сравнения порядка
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub enum GamePhase {
    AwaitingSurface,
    AwaitingCommit,
    Playing,
}

/// Состояние controller'а
///
/// Handles внутри вариантов — non-owning `Entity`, сущностями владеет World.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// Поверхность ещё не найдена
    #[default]
    AwaitingSurface,
    /// Маркер стоит на поверхности, ждём tap
    AwaitingCommit { marker: Entity },
    /// Сцена размещена, tap = бросок
    Playing {
        container: Entity,
        light: Option<Entity>,
    },
}

impl GameState {
    pub fn phase(&self) -> GamePhase {
        match self {
            GameState::AwaitingSurface => GamePhase::AwaitingSurface,
            GameState::AwaitingCommit { .. } => GamePhase::AwaitingCommit,
            GameState::Playing { .. } => GamePhase::Playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, GameState::Playing { .. })
    }

    /// Маркер (только пока не Playing)
    pub fn marker(&self) -> Option<Entity> {
        match self {
            GameState::AwaitingCommit { marker } => Some(*marker),
            _ => None,
        }
    }

    /// AwaitingSurface → AwaitingCommit. Из других состояний — false.
    pub fn surface_found(&mut self, marker: Entity) -> bool {
        if *self != GameState::AwaitingSurface {
            return false;
        }
        *self = GameState::AwaitingCommit { marker };
        true
    }

    /// AwaitingCommit → AwaitingSurface: маркер пропал из World.
    /// Следующий hit спавнит новый.
    pub fn marker_lost(&mut self) -> bool {
        if self.marker().is_none() {
            return false;
        }
        *self = GameState::AwaitingSurface;
        true
    }

    /// AwaitingCommit → Playing. Возвращает маркер, который надо удалить.
    pub fn commit(&mut self, scene: SceneHandles) -> Option<Entity> {
        let GameState::AwaitingCommit { marker } = *self else {
            return None;
        };
        *self = GameState::Playing {
            container: scene.container,
            light: scene.light,
        };
        Some(marker)
    }
}

/// "Tap to start" маркер на найденной поверхности
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlacementMarker {
    /// Сторона квадрата (метры)
    pub size: f32,
}

/// Event: tap по экрану (позиция в пикселях)
#[derive(Event, Debug, Clone, Copy)]
pub struct ScreenTapped {
    pub position: Vec2,
}

/// Event: сцена размещена (AwaitingCommit → Playing)
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStarted {
    pub container: Entity,
    pub position: Vec3,
}

/// Spawn маркера: плоскость лежит горизонтально (−π/2 вокруг X)
pub fn spawn_placement_marker(commands: &mut Commands, position: Vec3, size: f32) -> Entity {
    commands
        .spawn((
            Name::new("tap_to_start"),
            PlacementMarker { size },
            Transform::from_translation(position)
                .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
        ))
        .id()
}

/// Система: маркер следует за поверхностью (hit-test в центре экрана)
pub fn update_placement_marker<B: ArBackend>(
    mut commands: Commands,
    mut state: ResMut<GameState>,
    backend: Res<B>,
    config: Res<GameConfig>,
    mut markers: Query<&mut Transform, With<PlacementMarker>>,
) {
    if state.is_playing() {
        return;
    }

    if let Some(marker) = state.marker() {
        if !markers.contains(marker) {
            state.marker_lost();
            crate::log_warning(&format!(
                "Placement marker {:?} despawned (AwaitingCommit → AwaitingSurface)",
                marker
            ));
        }
    }

    // Берём только первый (ближайший) результат
    let center = backend.viewport_center();
    let Some(hit) = backend.hit_test(center, config.hit_test_kind).into_iter().next() else {
        return;
    };
    let position = hit.position();

    let current = *state;
    match current {
        GameState::AwaitingSurface => {
            let marker = spawn_placement_marker(&mut commands, position, config.marker_size);
            state.surface_found(marker);
            crate::log_info(&format!(
                "Surface found at {:?}: marker {:?} (AwaitingSurface → AwaitingCommit)",
                position, marker
            ));
        }
        GameState::AwaitingCommit { marker } => {
            if let Ok(mut transform) = markers.get_mut(marker) {
                transform.translation = position;
            }
        }
        GameState::Playing { .. } => {}
    }
}

/// Система: обработка tap'ов (commit или бросок, зависит от состояния)
#[allow(clippy::too_many_arguments)]
pub fn handle_screen_taps<B: ArBackend>(
    mut commands: Commands,
    mut taps: EventReader<ScreenTapped>,
    mut state: ResMut<GameState>,
    backend: Res<B>,
    config: Res<GameConfig>,
    scene: Option<Res<SceneHandles>>,
    time: Res<Time>,
    markers: Query<&Transform, With<PlacementMarker>>,
    mut containers: Query<
        (&mut Transform, &mut ContainerVisibility),
        (With<SceneContainer>, Without<PlacementMarker>),
    >,
    mut started_events: EventWriter<GameStarted>,
    mut launched_events: EventWriter<ProjectileLaunched>,
    mut stats: ResMut<GameStats>,
) {
    for _tap in taps.read() {
        let current = *state;
        match current {
            GameState::AwaitingSurface => {
                // Поверхность ещё не найдена — tap игнорируется
                continue;
            }
            GameState::AwaitingCommit { marker } => {
                let Some(scene) = scene.as_deref().copied() else {
                    crate::log_warning("Commit tap: scene not loaded yet");
                    continue;
                };
                let Ok(marker_transform) = markers.get(marker) else {
                    state.marker_lost();
                    crate::log_warning(&format!(
                        "Commit tap: marker {:?} not found, waiting for surface again",
                        marker
                    ));
                    continue;
                };
                let Ok((mut container_transform, mut visibility)) =
                    containers.get_mut(scene.container)
                else {
                    crate::log_error(&format!(
                        "Commit tap: container {:?} not found",
                        scene.container
                    ));
                    continue;
                };

                let position = marker_transform.translation;
                container_transform.translation = position;
                if visibility.reveal() {
                    stats.commits += 1;
                }

                if let Some(marker) = state.commit(scene) {
                    commands.entity(marker).despawn();
                }

                started_events.write(GameStarted {
                    container: scene.container,
                    position,
                });
                crate::log_info(&format!(
                    "Scene placed at {:?} (AwaitingCommit → Playing)",
                    position
                ));
            }
            GameState::Playing { .. } => {
                // Tracking ещё не готов — пропускаем бросок
                let Some(frame) = backend.current_frame() else {
                    continue;
                };

                let camera_transform = frame.camera_transform;
                let (projectile, impulse) =
                    spawn_projectile(&mut commands, &camera_transform, &config, time.elapsed());
                let position = camera_transform.w_axis.truncate();

                stats.projectiles_launched += 1;
                launched_events.write(ProjectileLaunched {
                    projectile,
                    position,
                    impulse,
                });
                crate::log(&format!(
                    "Projectile {:?} launched from {:?}, impulse {:?}",
                    projectile, position, impulse
                ));
            }
        }
    }
}
