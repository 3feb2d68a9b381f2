//! AR session boundary
//!
//! Камера, feature points и light estimation — внешняя платформа.
//! ECS видит её только через `ArBackend` (Resource), по аналогии с тем,
//! как tactical layer отдаёт данные strategic layer'у.
//!
//! Lifecycle:
//! - `ViewActivated` → загрузка сцены (один раз) + `run()` сессии
//! - `ViewDeactivated` → `pause()`, состояние игры не трогаем
//! - `SessionFailed` / `SessionInterrupted` / `SessionInterruptionEnded` —
//!   hooks без изменения состояния игры (только лог)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::scene::{spawn_scene_container, SceneDescription, SceneHandles};

pub mod simulated;

pub use simulated::{SimulatedArSession, SimulatedSessionConfig, SimulatedSessionPlugin};

/// Тип hit-test запроса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum HitTestKind {
    /// Облако feature points (работает до обнаружения плоскостей)
    FeaturePoint,
    /// Оценка горизонтальной плоскости
    EstimatedHorizontalPlane,
    /// Только уже обнаруженные плоскости
    ExistingPlane,
}

/// Один кандидат hit-test (в порядке удаления от камеры)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTestResult {
    pub world_transform: Mat4,
    /// Расстояние от камеры вдоль луча (метры)
    pub distance: f32,
}

impl HitTestResult {
    pub fn from_position(position: Vec3, distance: f32) -> Self {
        Self {
            world_transform: Mat4::from_translation(position),
            distance,
        }
    }

    /// Translation компонент world transform
    pub fn position(&self) -> Vec3 {
        self.world_transform.w_axis.truncate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEstimate {
    /// Оценка освещённости (1000 ≈ нейтральное освещение)
    pub ambient_intensity: f32,
}

/// Снимок tracking кадра
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArFrame {
    /// Поза камеры (device pose) в world space
    pub camera_transform: Mat4,
    pub light_estimate: Option<LightEstimate>,
    /// Секунды с начала сессии
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldTrackingConfiguration {
    pub light_estimation_enabled: bool,
}

impl Default for WorldTrackingConfiguration {
    fn default() -> Self {
        Self {
            light_estimation_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    Running,
    Paused,
}

/// Внешняя AR платформа (tracking, hit-test, light estimation)
///
/// Реализация — Resource, чтобы системы получали её через `Res<B>` /
/// `ResMut<B>` без dynamic dispatch.
pub trait ArBackend: Resource {
    /// Кандидаты поверхности вдоль луча через `screen_point` (пиксели).
    /// Пустой Vec = ничего не найдено.
    fn hit_test(&self, screen_point: Vec2, kind: HitTestKind) -> Vec<HitTestResult>;

    /// Последний tracking кадр (None пока tracking не готов)
    fn current_frame(&self) -> Option<&ArFrame>;

    /// Размер viewport (пиксели)
    fn viewport_size(&self) -> Vec2;

    fn run(&mut self, configuration: &WorldTrackingConfiguration);

    fn pause(&mut self);

    fn status(&self) -> SessionStatus;

    fn viewport_center(&self) -> Vec2 {
        self.viewport_size() * 0.5
    }
}

/// Event: экран стал активным (аналог "view will appear")
#[derive(Event, Debug, Clone, Default)]
pub struct ViewActivated;

/// Event: экран ушёл с переднего плана
#[derive(Event, Debug, Clone, Default)]
pub struct ViewDeactivated;

/// Event: сессия упала с ошибкой
#[derive(Event, Debug, Clone)]
pub struct SessionFailed {
    pub reason: String,
}

#[derive(Event, Debug, Clone, Default)]
pub struct SessionInterrupted;

#[derive(Event, Debug, Clone, Default)]
pub struct SessionInterruptionEnded;

/// Флаг diagnostics overlay (FPS / frame time), рисует клиент
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsOverlay {
    pub visible: bool,
}

/// Система: активация экрана
///
/// Первая активация загружает сцену (container скрыт) и сохраняет handles.
/// Каждая активация запускает world tracking.
pub fn handle_view_activation<B: ArBackend>(
    mut commands: Commands,
    mut events: EventReader<ViewActivated>,
    mut backend: ResMut<B>,
    config: Res<GameConfig>,
    description: Res<SceneDescription>,
    handles: Option<Res<SceneHandles>>,
) {
    // Несколько активаций за кадр = одна
    if events.read().count() == 0 {
        return;
    }

    if handles.is_none() {
        let spawned = spawn_scene_container(&mut commands, &description);
        commands.insert_resource(spawned);
        commands.insert_resource(StatisticsOverlay {
            visible: config.show_statistics,
        });
        crate::log_info(&format!(
            "Scene loaded: container {:?} (hidden), {} blocks",
            spawned.container,
            description.blocks.len()
        ));
    }

    backend.run(&WorldTrackingConfiguration::default());
    crate::log_info("AR session: running (world tracking)");
}

/// Система: деактивация экрана — пауза сессии
///
/// Marker/container/projectiles остаются в мире как есть.
pub fn handle_view_deactivation<B: ArBackend>(
    mut events: EventReader<ViewDeactivated>,
    mut backend: ResMut<B>,
) {
    if events.read().count() == 0 {
        return;
    }

    backend.pause();
    crate::log_info("AR session: paused");
}

/// Система: session hooks
///
/// Пользовательских сообщений пока нет — только лог.
pub fn log_session_hooks(
    mut failed: EventReader<SessionFailed>,
    mut interrupted: EventReader<SessionInterrupted>,
    mut interruption_ended: EventReader<SessionInterruptionEnded>,
) {
    for event in failed.read() {
        crate::log_error(&format!("AR session failed: {}", event.reason));
    }
    for _ in interrupted.read() {
        crate::log_warning("AR session interrupted");
    }
    for _ in interruption_ended.read() {
        crate::log_info("AR session interruption ended");
    }
}
