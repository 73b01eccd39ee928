use bevy::input::ButtonInput;
use bevy::math::Vec2;
use bevy::prelude::{KeyCode, Res, ResMut, Resource};

/// Edge-detected input snapshot, sampled once per `Update`.
///
/// `jump_pressed`/`jump_released` are true for exactly one tick per physical
/// edge; the controller never infers edges from the held state on its own.
/// The fixed-rate systems read whatever snapshot is latest when they run.
#[derive(Resource, Default, Debug, Copy, Clone)]
pub struct PlayerInput {
    /// Directional input in [-1, 1] on each axis; the controller only
    /// consumes x
    pub move_axis: Vec2,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub jump_released: bool,
}

pub fn sample_input(kb: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut axis = Vec2::ZERO;
    if kb.pressed(KeyCode::KeyA) || kb.pressed(KeyCode::ArrowLeft) {
        axis.x -= 1.0;
    }
    if kb.pressed(KeyCode::KeyD) || kb.pressed(KeyCode::ArrowRight) {
        axis.x += 1.0;
    }
    if kb.pressed(KeyCode::KeyW) || kb.pressed(KeyCode::ArrowUp) {
        axis.y += 1.0;
    }
    if kb.pressed(KeyCode::KeyS) || kb.pressed(KeyCode::ArrowDown) {
        axis.y -= 1.0;
    }

    input.move_axis = axis;
    input.jump_pressed = kb.just_pressed(KeyCode::Space);
    input.jump_held = kb.pressed(KeyCode::Space);
    input.jump_released = kb.just_released(KeyCode::Space);
}
