//! Lighting sync: ambient intensity estimate → directional light сцены
//!
//! Прямой проброс каждый кадр, без сглаживания (мерцание при шумном
//! estimate — ожидаемое поведение). До commit'а свет не трогаем.

use bevy::prelude::*;

use crate::placement::GameState;
use crate::scene::SceneLight;
use crate::session::ArBackend;

pub fn sync_light_estimate<B: ArBackend>(
    state: Res<GameState>,
    backend: Res<B>,
    mut lights: Query<&mut SceneLight>,
) {
    let GameState::Playing {
        light: Some(light), ..
    } = *state
    else {
        return;
    };
    let Some(estimate) = backend.current_frame().and_then(|frame| frame.light_estimate) else {
        return;
    };

    if let Ok(mut scene_light) = lights.get_mut(light) {
        scene_light.intensity = estimate.ambient_intensity;
    }
}
