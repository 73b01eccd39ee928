use crate::player::{
    sense_contacts, MovementParams, Player, PlayerInput, PlayerMovementState,
};
use bevy::asset::Assets;
use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy::prelude::{Entity, Query, Res, Sprite, Time};
use bevy_rapier2d::dynamics::Velocity;
use bevy_rapier2d::geometry::CollisionGroups;
use bevy_rapier2d::plugin::ReadRapierContext;

/// Resting velocity while grounded. Landing parks the body here instead of at
/// zero, which would let it float for a frame before contacts re-assert.
const LANDED_VERTICAL_VELOCITY: f32 = -9.81;

/// Downward nudge that ends the apex hang without a visible snap
const APEX_EXIT_NUDGE: f32 = -0.01;

/// Safety cap on upward speed; nothing in the controller is designed to
/// reach it
const MAX_RISE_SPEED: f32 = 50.0;

/// Variable-rate tick: advance the input-driven timers, then run the jump
/// state transitions off this tick's input edges.
pub fn player_jump_input_system(
    input: Res<PlayerInput>,
    control_params: Res<Assets<MovementParams>>,
    time: Res<Time>,
    mut player_query: Query<(&Player, &mut PlayerMovementState)>,
) {
    let dt = time.delta_secs();

    for (player, mut state) in &mut player_query {
        let Some(params) = control_params.get(player.0.id()) else {
            info!("player params not loaded yet");
            continue;
        };

        update_timers(&mut state, params, dt);
        handle_jump_input(&mut state, params, &input);
    }
}

/// Fixed-rate tick: re-sample contacts, integrate the vertical velocity,
/// then compute the horizontal velocity from the latest input snapshot, and
/// hand the result to the physics body.
///
/// The order matters: the horizontal pass picks its acceleration pair based
/// on the contact state sampled at the top of this same tick.
pub fn player_fixed_system(
    input: Res<PlayerInput>,
    control_params: Res<Assets<MovementParams>>,
    time: Res<Time>,
    rapier_context: ReadRapierContext,
    collision_groups: Query<&CollisionGroups>,
    mut player_query: Query<(
        Entity,
        &Player,
        &mut PlayerMovementState,
        &mut Velocity,
        &mut Sprite,
    )>,
) {
    let rapier_context = rapier_context.single();
    let dt = time.delta_secs();

    for (player_entity, player, mut state, mut velocity, mut sprite) in &mut player_query {
        let Some(params) = control_params.get(player.0.id()) else {
            continue;
        };

        state.contacts = sense_contacts(
            &rapier_context,
            player_entity,
            params.ground_layer_mask,
            &collision_groups,
        );

        integrate_vertical(&mut state, params, dt);

        let input_x = input.move_axis.x;
        if should_turn(state.facing_right, input_x) {
            state.facing_right = !state.facing_right;
            sprite.flip_x = !state.facing_right;
            debug!(
                "turned to face {}",
                if state.facing_right { "right" } else { "left" }
            );
        }

        // blend from the body's current horizontal velocity rather than our
        // own bookkeeping, so external pushes (knockback, moving platforms)
        // decay through the same model instead of being overwritten
        let (accel, decel) = if state.contacts.is_grounded {
            (params.ground_acceleration, params.ground_deceleration)
        } else {
            (params.air_acceleration, params.air_deceleration)
        };
        state.move_velocity.x = next_horizontal_velocity(
            velocity.linvel.x,
            input_x,
            accel,
            decel,
            params.max_walk_speed,
            dt,
        );
        state.move_velocity.y = state.vertical_velocity;

        velocity.linvel = Vec2::new(state.move_velocity.x, state.vertical_velocity);
    }
}

/// Advance the jump-buffer and coyote countdowns by one variable-rate tick.
/// Being grounded refreshes coyote time instead of spending it.
pub fn update_timers(state: &mut PlayerMovementState, params: &MovementParams, dt: f32) {
    state.jump_buffer.tick(dt);
    if state.contacts.is_grounded {
        state.coyote.set(params.jump_coyote_time);
    } else {
        state.coyote.tick(dt);
    }
}

/// Jump state transitions for one variable-rate tick, evaluated in a fixed
/// order: press, release, ground jump, air jump, landing.
pub fn handle_jump_input(
    state: &mut PlayerMovementState,
    params: &MovementParams,
    input: &PlayerInput,
) {
    // press: arm the buffer; from here on the machine checks the buffer, not
    // the raw input
    if input.jump_pressed {
        state.jump_buffer.set(params.jump_buffer_time);
        state.jump_release_during_buffer = false;
    }

    // release: remember it if a press is still buffered, and cut any
    // in-progress rise
    if input.jump_released {
        if state.jump_buffer.is_active() {
            state.jump_release_during_buffer = true;
        }
        if state.is_jumping && state.vertical_velocity > 0.0 {
            if state.is_past_apex_threshold {
                // cancel the hang outright: skip the decay lerp and let
                // release gravity take over immediately
                state.is_past_apex_threshold = false;
                state.do_jump_cut = true;
                state.jump_cut_time = params.time_for_upwards_cancel;
                state.vertical_velocity = 0.0;
            } else {
                state.do_jump_cut = true;
                state.jump_cut_release_speed = state.vertical_velocity;
            }
        }
    }

    let jump_was_buffered = state.jump_buffer.is_active();
    let can_ground_jump = jump_was_buffered
        && !state.is_jumping
        && (state.contacts.is_grounded || state.coyote.is_active());
    let can_air_jump =
        jump_was_buffered && state.is_jumping && state.jumps_used < params.jumps_allowed;

    if can_ground_jump {
        debug!("jumping with coyote time {:?}", state.coyote.remaining());
        initiate_jump(state, params);
    } else if can_air_jump {
        // an air jump overrides any in-progress cut or fall with a fresh arc
        debug!("air jumping, {} used", state.jumps_used);
        state.do_jump_cut = false;
        initiate_jump(state, params);
    }

    // landing: collapse the whole machine back to the grounded state
    if (state.is_jumping || state.is_falling)
        && state.contacts.is_grounded
        && state.vertical_velocity <= 0.0
    {
        state.is_jumping = false;
        state.is_falling = false;
        state.do_jump_cut = false;
        state.jump_cut_time = 0.0;
        state.is_past_apex_threshold = false;
        state.jumps_used = 0;
        state.vertical_velocity = LANDED_VERTICAL_VELOCITY;
    }
}

fn initiate_jump(state: &mut PlayerMovementState, params: &MovementParams) {
    let release_was_buffered = state.jump_release_during_buffer;

    state.is_jumping = true;
    state.jump_buffer.expire();
    state.jump_release_during_buffer = false;
    state.jumps_used += 1;
    state.vertical_velocity = params.initial_jump_velocity;

    if release_was_buffered {
        // the button already went back up; the fresh jump starts cut
        state.do_jump_cut = true;
        state.jump_cut_release_speed = state.vertical_velocity;
    }
}

/// Vertical velocity integration for one fixed-rate tick: the rising arc and
/// apex hang while jumping, then the jump-cut decay, then ledge-fall gravity,
/// and finally the unconditional fall-speed clamp.
pub fn integrate_vertical(state: &mut PlayerMovementState, params: &MovementParams, dt: f32) {
    if state.is_jumping {
        if state.contacts.bumped_head {
            state.do_jump_cut = true;
        }

        if state.vertical_velocity >= 0.0 {
            state.apex_point =
                inverse_lerp(params.initial_jump_velocity, 0.0, state.vertical_velocity);

            if state.apex_point > params.apex_threshold {
                if !state.is_past_apex_threshold {
                    state.is_past_apex_threshold = true;
                    state.time_past_apex_threshold = 0.0;
                }
                state.time_past_apex_threshold += dt;
                state.vertical_velocity = if state.time_past_apex_threshold < params.apex_hang_time
                {
                    0.0
                } else {
                    APEX_EXIT_NUDGE
                };
            } else {
                state.vertical_velocity += params.gravity * dt;
                if state.is_past_apex_threshold {
                    // an air jump restarted the rising arc from inside a hang
                    state.is_past_apex_threshold = false;
                }
            }
        } else if !state.do_jump_cut {
            state.vertical_velocity +=
                params.gravity * params.gravity_on_release_multiplier * dt;
        }
    }

    if state.do_jump_cut {
        if state.jump_cut_time >= params.time_for_upwards_cancel {
            state.vertical_velocity +=
                params.gravity * params.gravity_on_release_multiplier * dt;
        } else {
            // time-bounded deceleration to zero, independent of gravity, so
            // a cut always takes the same wall-clock time regardless of the
            // release speed
            state.vertical_velocity = lerp(
                state.jump_cut_release_speed,
                0.0,
                state.jump_cut_time / params.time_for_upwards_cancel,
            );
        }
        state.jump_cut_time += dt;
    }

    // walking off a ledge without jumping
    if !state.contacts.is_grounded && !state.is_jumping {
        if !state.is_falling {
            state.is_falling = true;
        }
        state.vertical_velocity += params.gravity * params.gravity_on_ledge_fall * dt;
    }

    state.vertical_velocity = state
        .vertical_velocity
        .clamp(-params.max_fall_speed, MAX_RISE_SPEED);
}

/// Solve for the new horizontal velocity by interpolating the current
/// velocity towards the input's target speed. The interpolation is a convex
/// combination, so it can approach the target but never overshoot it.
pub fn next_horizontal_velocity(
    current_vel: f32,
    input_x: f32,
    acceleration: f32,
    deceleration: f32,
    max_walk_speed: f32,
    dt: f32,
) -> f32 {
    if input_x != 0.0 {
        lerp(current_vel, input_x * max_walk_speed, acceleration * dt)
    } else {
        lerp(current_vel, 0.0, deceleration * dt)
    }
}

fn should_turn(facing_right: bool, input_x: f32) -> bool {
    (facing_right && input_x < 0.0) || (!facing_right && input_x > 0.0)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    if from == to {
        0.0
    } else {
        ((value - from) / (to - from)).clamp(0.0, 1.0)
    }
}
