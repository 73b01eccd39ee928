use crate::player::ContactState;
use crate::util::CountdownTimer;
use bevy::math::Vec2;
use bevy::prelude::Component;

/// Per-character movement state, created once at spawn and mutated only by
/// the controller's tick systems. Every character owns exactly one of these.
#[derive(Component, Debug)]
pub struct PlayerMovementState {
    /// Which way the character faces; characters spawn facing right
    pub facing_right: bool,

    /// Velocity derived from the horizontal inputs; only x is meaningful
    pub move_velocity: Vec2,

    pub vertical_velocity: f32,

    /// Airborne as the result of a jump (as opposed to falling off a ledge)
    pub is_jumping: bool,

    pub is_falling: bool,

    /// An early release (or a head bump) is decelerating the rise
    pub do_jump_cut: bool,

    /// Inside the apex-hang window at the top of the arc
    pub is_past_apex_threshold: bool,

    /// Time elapsed since the jump cut began
    pub jump_cut_time: f32,

    /// Upward velocity captured at the moment of the cut; the decay lerps
    /// from here down to zero
    pub jump_cut_release_speed: f32,

    /// Progress along the rising arc: 0 at launch, 1 at the apex
    pub apex_point: f32,

    pub time_past_apex_threshold: f32,

    /// Jumps consumed since the last landing; never exceeds `jumps_allowed`
    pub jumps_used: u32,

    /// Input buffer for jumping: set on a press edge, consumed by the jump
    pub jump_buffer: CountdownTimer,

    /// Grace window after walking off a ledge during which a ground jump is
    /// still accepted
    pub coyote: CountdownTimer,

    /// Latched when the button goes back up while a press is still buffered,
    /// so the buffered jump starts already cut
    pub jump_release_during_buffer: bool,

    /// Ground/ceiling flags sampled on the most recent fixed tick
    pub contacts: ContactState,
}

impl Default for PlayerMovementState {
    fn default() -> Self {
        PlayerMovementState {
            facing_right: true,
            move_velocity: Vec2::ZERO,
            vertical_velocity: 0.0,
            is_jumping: false,
            is_falling: false,
            do_jump_cut: false,
            is_past_apex_threshold: false,
            jump_cut_time: 0.0,
            jump_cut_release_speed: 0.0,
            apex_point: 0.0,
            time_past_apex_threshold: 0.0,
            jumps_used: 0,
            jump_buffer: CountdownTimer::default(),
            coyote: CountdownTimer::default(),
            jump_release_during_buffer: false,
            contacts: ContactState::default(),
        }
    }
}
