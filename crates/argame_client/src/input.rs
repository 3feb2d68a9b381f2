use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowFocused};

use argame_simulation::{ArGameSet, ScreenTapped, ViewActivated, ViewDeactivated};

/// Ввод и lifecycle окна → события симуляции
///
/// - Левая кнопка мыши / touch → ScreenTapped
/// - Старт приложения и фокус окна → ViewActivated
/// - Потеря фокуса → ViewDeactivated
pub struct TapInputPlugin;

impl Plugin for TapInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, activate_on_startup).add_systems(
            Update,
            (emit_screen_taps, emit_view_lifecycle).before(ArGameSet),
        );
    }
}

fn activate_on_startup(mut activated: EventWriter<ViewActivated>) {
    activated.write(ViewActivated);
}

fn emit_screen_taps(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut taps: EventWriter<ScreenTapped>,
) {
    if mouse_buttons.just_pressed(MouseButton::Left) {
        let position = windows
            .single()
            .ok()
            .and_then(|window| window.cursor_position())
            .unwrap_or_default();
        taps.write(ScreenTapped { position });
    }

    for touch in touches.iter_just_pressed() {
        taps.write(ScreenTapped {
            position: touch.position(),
        });
    }
}

fn emit_view_lifecycle(
    mut focus_events: EventReader<WindowFocused>,
    mut activated: EventWriter<ViewActivated>,
    mut deactivated: EventWriter<ViewDeactivated>,
) {
    for event in focus_events.read() {
        if event.focused {
            activated.write(ViewActivated);
        } else {
            deactivated.write(ViewDeactivated);
        }
    }
}
