//! ARGame Simulation Core
//!
//! ECS логика AR экрана на Bevy 0.16:
//! - placement state machine (маркер → commit → игра)
//! - projectiles (spawn из позы камеры, impulse, таймаут 10 сек)
//! - lighting sync (light estimate → directional light)
//! - session lifecycle hooks
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state, правила, state machine
//! - AR платформа (`ArBackend`) = tracking, hit-test, light estimation
//! - Клиент = рендер + ввод

use std::marker::PhantomData;

use bevy::prelude::*;
use bevy_rapier3d::prelude::CollisionEvent;

// Публичные модули
pub mod config;
pub mod lighting;
pub mod logger;
pub mod placement;
pub mod projectile;
pub mod scene;
pub mod session;

// Re-export основных типов
pub use config::{ConfigError, GameConfig};
pub use logger::*;
pub use placement::{GamePhase, GameStarted, GameState, PlacementMarker, ScreenTapped};
pub use projectile::{
    launch_impulse, launch_origin, DespawnAfter, Projectile, ProjectileContact, ProjectileExpired,
    ProjectileLaunched,
};
pub use scene::{
    ContainerVisibility, SceneBody, SceneBodyKind, SceneContainer, SceneDescription, SceneHandles,
    SceneLight,
};
pub use session::{
    ArBackend, ArFrame, HitTestKind, HitTestResult, LightEstimate, SessionFailed,
    SessionInterrupted, SessionInterruptionEnded, SessionStatus, SimulatedArSession,
    SimulatedSessionConfig, SimulatedSessionPlugin, StatisticsOverlay, ViewActivated,
    ViewDeactivated, WorldTrackingConfiguration,
};

/// Счётчики игры (для overlay и тестов)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    /// Сколько раз container стал видимым (≤ 1)
    pub commits: u32,
    pub projectiles_launched: u32,
    pub projectiles_expired: u32,
    pub projectile_contacts: u32,
}

impl GameStats {
    /// Снаряды, которые сейчас в сцене
    pub fn projectiles_alive(&self) -> u32 {
        self.projectiles_launched - self.projectiles_expired
    }
}

/// Все системы controller'а (одна цепочка, один кадр)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArGameSet;

/// Главный plugin AR экрана
///
/// Порядок выполнения (Update, `.chain()`):
/// 1. handle_view_activation / handle_view_deactivation — lifecycle
/// 2. log_session_hooks — failure / interruption hooks
/// 3. update_placement_marker — hit-test, маркер
/// 4. handle_screen_taps — commit или бросок
/// 5. enable_scene_physics — физика сцены после commit'а
/// 6. sync_light_estimate — свет
/// 7. detect_projectile_contacts — Rapier contacts → ProjectileContact
/// 8. despawn_expired_projectiles — таймаут снарядов
pub struct ArGamePlugin<B: ArBackend> {
    _backend: PhantomData<fn() -> B>,
}

impl<B: ArBackend> Default for ArGamePlugin<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: ArBackend> Plugin for ArGamePlugin<B> {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<SceneDescription>()
            .init_resource::<GameState>()
            .init_resource::<GameStats>()
            .init_resource::<StatisticsOverlay>();

        // Регистрация событий
        app.add_event::<ScreenTapped>()
            .add_event::<GameStarted>()
            .add_event::<ViewActivated>()
            .add_event::<ViewDeactivated>()
            .add_event::<SessionFailed>()
            .add_event::<SessionInterrupted>()
            .add_event::<SessionInterruptionEnded>()
            .add_event::<ProjectileLaunched>()
            .add_event::<ProjectileExpired>()
            .add_event::<ProjectileContact>()
            // Rapier plugin регистрирует его сам; headless без Rapier — тоже нужен
            .add_event::<CollisionEvent>();

        app.add_systems(
            Update,
            (
                session::handle_view_activation::<B>,
                session::handle_view_deactivation::<B>,
                session::log_session_hooks,
                placement::update_placement_marker::<B>,
                placement::handle_screen_taps::<B>,
                scene::enable_scene_physics,
                lighting::sync_light_estimate::<B>,
                projectile::detect_projectile_contacts,
                projectile::despawn_expired_projectiles,
            )
                .chain() // Последовательное выполнение
                .in_set(ArGameSet),
        );
    }
}

/// Создаёт minimal Bevy App для headless симуляции (SimulatedArSession)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulatedSessionPlugin {
            config: SimulatedSessionConfig {
                seed,
                ..default()
            },
        })
        .add_plugins(ArGamePlugin::<SimulatedArSession>::default());

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
