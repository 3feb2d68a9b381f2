//! SimulatedArSession — детерминированная AR платформа
//!
//! Используется headless бинарником, тестами и desktop клиентом:
//! - "обнаруженная поверхность" = горизонтальная плоскость y = surface_height
//! - hit-test = луч из камеры через screen point (pinhole, vertical fov)
//! - light estimate = base intensity + шум из seeded ChaCha8Rng

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{
    ArBackend, ArFrame, HitTestKind, HitTestResult, LightEstimate, SessionStatus,
    WorldTrackingConfiguration,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSessionConfig {
    /// Высота "реального" пола (метры)
    pub surface_height: f32,
    /// Vertical field of view камеры (радианы)
    pub vertical_fov: f32,
    pub viewport: Vec2,
    /// None = платформа не отдаёт light estimate
    pub base_ambient_intensity: Option<f32>,
    /// Амплитуда шума light estimate (±)
    pub ambient_noise: f32,
    pub seed: u64,
}

impl Default for SimulatedSessionConfig {
    fn default() -> Self {
        Self {
            surface_height: 0.0,
            vertical_fov: std::f32::consts::FRAC_PI_3, // 60°
            viewport: Vec2::new(1280.0, 720.0),
            base_ambient_intensity: Some(1000.0),
            ambient_noise: 50.0,
            seed: 42,
        }
    }
}

#[derive(Resource)]
pub struct SimulatedArSession {
    config: SimulatedSessionConfig,
    status: SessionStatus,
    viewport: Vec2,
    camera_transform: Option<Mat4>,
    surface_detected: bool,
    /// Если не пусто — возвращается вместо raycast по плоскости
    scripted_hits: Vec<HitTestResult>,
    light_estimation: bool,
    ambient_intensity: Option<f32>,
    frame: Option<ArFrame>,
    elapsed: f64,
    rng: ChaCha8Rng,
}

impl SimulatedArSession {
    pub fn new(config: SimulatedSessionConfig) -> Self {
        Self {
            status: SessionStatus::NotStarted,
            viewport: config.viewport,
            camera_transform: None,
            surface_detected: true,
            scripted_hits: Vec::new(),
            light_estimation: false,
            ambient_intensity: config.base_ambient_intensity,
            frame: None,
            elapsed: 0.0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Поза устройства (None = tracking недоступен)
    pub fn set_camera_transform(&mut self, transform: Option<Mat4>) {
        self.camera_transform = transform;
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport = size;
    }

    /// Есть ли feature points на поверхности (false = hit-test пустой)
    pub fn set_surface_detected(&mut self, detected: bool) {
        self.surface_detected = detected;
    }

    pub fn set_scripted_hits(&mut self, hits: Vec<HitTestResult>) {
        self.scripted_hits = hits;
    }

    pub fn set_ambient_intensity(&mut self, intensity: Option<f32>) {
        self.ambient_intensity = intensity;
    }

    pub fn config(&self) -> &SimulatedSessionConfig {
        &self.config
    }

    /// Новый tracking кадр (только пока сессия running)
    pub fn advance(&mut self, delta_secs: f64) {
        if self.status != SessionStatus::Running {
            return;
        }

        self.elapsed += delta_secs;
        let light_estimate = self.sample_light_estimate();
        self.frame = self.camera_transform.map(|camera_transform| ArFrame {
            camera_transform,
            light_estimate,
            timestamp: self.elapsed,
        });
    }

    fn sample_light_estimate(&mut self) -> Option<LightEstimate> {
        if !self.light_estimation {
            return None;
        }

        let base = self.ambient_intensity?;
        let noise = self.config.ambient_noise;
        let ambient_intensity = if noise > 0.0 {
            base + self.rng.gen_range(-noise..=noise)
        } else {
            base
        };

        Some(LightEstimate {
            ambient_intensity: ambient_intensity.max(0.0),
        })
    }

    /// Луч из камеры через screen point (origin, direction)
    fn screen_ray(&self, camera: &Mat4, screen_point: Vec2) -> Option<(Vec3, Vec3)> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(
            screen_point.x / self.viewport.x * 2.0 - 1.0,
            1.0 - screen_point.y / self.viewport.y * 2.0,
        );
        let half_height = (self.config.vertical_fov * 0.5).tan();
        let aspect = self.viewport.x / self.viewport.y;

        // Камера смотрит вдоль -Z (как и device pose)
        let local_direction = Vec3::new(ndc.x * half_height * aspect, ndc.y * half_height, -1.0);
        let direction = camera.transform_vector3(local_direction).normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        Some((camera.w_axis.truncate(), direction))
    }
}

impl Default for SimulatedArSession {
    fn default() -> Self {
        Self::new(SimulatedSessionConfig::default())
    }
}

impl ArBackend for SimulatedArSession {
    fn hit_test(&self, screen_point: Vec2, _kind: HitTestKind) -> Vec<HitTestResult> {
        if self.status != SessionStatus::Running || !self.surface_detected {
            return Vec::new();
        }
        if !self.scripted_hits.is_empty() {
            return self.scripted_hits.clone();
        }

        let Some(camera) = self.camera_transform else {
            return Vec::new();
        };
        let Some((origin, direction)) = self.screen_ray(&camera, screen_point) else {
            return Vec::new();
        };

        // Пересечение с горизонтальной плоскостью
        if direction.y.abs() < 1e-6 {
            return Vec::new();
        }
        let distance = (self.config.surface_height - origin.y) / direction.y;
        if distance <= 0.0 {
            return Vec::new();
        }

        vec![HitTestResult::from_position(origin + direction * distance, distance)]
    }

    fn current_frame(&self) -> Option<&ArFrame> {
        self.frame.as_ref()
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn run(&mut self, configuration: &WorldTrackingConfiguration) {
        self.light_estimation = configuration.light_estimation_enabled;
        self.status = SessionStatus::Running;
    }

    fn pause(&mut self) {
        self.status = SessionStatus::Paused;
    }

    fn status(&self) -> SessionStatus {
        self.status
    }
}

/// Система: новый tracking кадр каждый frame
pub fn advance_simulated_session(mut session: ResMut<SimulatedArSession>, time: Res<Time>) {
    session.advance(time.delta_secs_f64());
}

/// Plugin: SimulatedArSession как AR backend
#[derive(Default)]
pub struct SimulatedSessionPlugin {
    pub config: SimulatedSessionConfig,
}

impl Plugin for SimulatedSessionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulatedArSession::new(self.config.clone()))
            .add_systems(PreUpdate, advance_simulated_session);
    }
}
