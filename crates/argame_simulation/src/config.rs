//! Настройки игрового экрана (GameConfig resource)
//!
//! Значения по умолчанию совпадают с оригинальным AR экраном.
//! JSON загрузка нужна для тюнинга без пересборки.

use std::fmt;
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::session::HitTestKind;

/// Параметры controller'а (placement + projectiles + overlay)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Множители launch вектора по осям (lateral, vertical, depth)
    pub launch_scale: [f32; 3],
    /// Радиус снаряда (метры)
    pub projectile_radius: f32,
    /// Масса снаряда (кг); impulse 5 → 5 m/s
    pub projectile_mass: f32,
    /// Через сколько секунд снаряд удаляется из сцены
    pub projectile_lifetime_secs: f32,
    /// Сторона квадратного "Tap to start" маркера (метры)
    pub marker_size: f32,
    /// Тип hit-test запроса для поиска поверхности
    pub hit_test_kind: HitTestKind,
    /// Diagnostics overlay (FPS / frame time)
    pub show_statistics: bool,
    /// Клиент: ambient intensity → illuminance (lux)
    pub light_illuminance_scale: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            launch_scale: [5.0, 10.0, 5.0], // Вверх сильнее, чем вбок (дуга)
            projectile_radius: 0.1,
            projectile_mass: 1.0,
            projectile_lifetime_secs: 10.0,
            marker_size: 0.15, // 15cm x 15cm
            hit_test_kind: HitTestKind::FeaturePoint,
            show_statistics: true,
            light_illuminance_scale: 10.0, // 1000 (нейтральный estimate) → 10000 lux
        }
    }
}

impl GameConfig {
    /// Парсит конфиг из JSON (отсутствующие поля берутся из Default)
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.projectile_radius > 0.0) {
            return Err(ConfigError::Invalid("projectile_radius must be positive"));
        }
        if !(self.projectile_mass > 0.0) {
            return Err(ConfigError::Invalid("projectile_mass must be positive"));
        }
        if !(self.projectile_lifetime_secs > 0.0) || !self.projectile_lifetime_secs.is_finite() {
            return Err(ConfigError::Invalid("projectile_lifetime_secs must be positive"));
        }
        if !(self.marker_size > 0.0) {
            return Err(ConfigError::Invalid("marker_size must be positive"));
        }
        if self.launch_scale.iter().any(|s| !s.is_finite()) {
            return Err(ConfigError::Invalid("launch_scale must be finite"));
        }
        Ok(())
    }

    pub fn launch_scale(&self) -> Vec3 {
        Vec3::from_array(self.launch_scale)
    }

    pub fn projectile_lifetime(&self) -> Duration {
        Duration::from_secs_f32(self.projectile_lifetime_secs)
    }
}

/// Ошибка загрузки GameConfig
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "failed to parse game config: {}", err),
            ConfigError::Invalid(reason) => write!(f, "invalid game config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.launch_scale(), Vec3::new(5.0, 10.0, 5.0));
        assert_eq!(config.projectile_lifetime(), Duration::from_secs(10));
        assert_eq!(config.hit_test_kind, HitTestKind::FeaturePoint);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "projectile_radius": 0.25 }"#)
            .expect("valid config");

        assert_eq!(config.projectile_radius, 0.25);
        assert_eq!(config.marker_size, 0.15);
        assert_eq!(config.launch_scale, [5.0, 10.0, 5.0]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GameConfig::from_json_str(r#"{ "projectile_lifetime_secs": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
