use bevy::prelude::{Asset, TypePath};
use serde::Deserialize;

/// Lower bound for durations that appear as divisors in the derived-value
/// formulas. A zero here would put NaN/infinity into every later tick, so
/// degenerate configs are clamped up to this instead.
const MIN_DIVISOR_TIME: f32 = 1e-4;

/// Tuning bundle for the movement controller, loaded from `assets/player.ron`.
///
/// The raw fields come straight from the tuning file. The derived fields
/// (`adjusted_jump_height`, `gravity`, `initial_jump_velocity`) are never
/// read from the file; [MovementParams::finalize] recomputes them from the
/// raw values, and must run after *any* raw-field edit so no controller tick
/// ever observes a stale derivation.
#[derive(Asset, Copy, Clone, Debug, Deserialize, TypePath)]
pub struct MovementParams {
    // Walk
    pub max_walk_speed: f32,
    pub ground_acceleration: f32,
    pub ground_deceleration: f32,
    pub air_acceleration: f32,
    pub air_deceleration: f32,

    /// Collision-group memberships that count as "ground" for the contact
    /// sensor, as a raw bitmask
    pub ground_layer_mask: u32,

    // Jump
    pub jump_height: f32,
    /// Fudge factor so the realized arc actually reaches `jump_height`
    /// despite discrete integration
    pub jump_height_compensation_factor: f32,
    pub time_till_jump_apex: f32,
    /// Gravity multiplier while descending after a jump (held or cut)
    pub gravity_on_release_multiplier: f32,
    /// Gravity multiplier when falling off a ledge without jumping
    pub gravity_on_ledge_fall: f32,
    pub max_fall_speed: f32,
    pub jumps_allowed: u32,

    // Jump cut
    /// How long a cut jump takes to decelerate its upward velocity to zero
    pub time_for_upwards_cancel: f32,
    pub min_jump_cut_percent: f32,

    // Jump apex
    /// How far along the rising arc (0 = launch, 1 = apex) the hang begins
    pub apex_threshold: f32,
    pub apex_hang_time: f32,

    // Buffer / coyote
    pub jump_buffer_time: f32,
    pub jump_coyote_time: f32,

    // Derived values, recomputed by `finalize`
    #[serde(skip)]
    pub adjusted_jump_height: f32,
    #[serde(skip)]
    pub gravity: f32,
    #[serde(skip)]
    pub initial_jump_velocity: f32,
}

impl MovementParams {
    /// Clamp raw values into their supported ranges, then recompute the
    /// derived values. The clamp-and-derive pair is the single "configuration
    /// edit" step: callers mutate raw fields, call this, and only then let a
    /// controller tick read the params.
    pub fn finalize(&mut self) {
        self.time_till_jump_apex = self.time_till_jump_apex.max(MIN_DIVISOR_TIME);
        self.time_for_upwards_cancel = self.time_for_upwards_cancel.max(MIN_DIVISOR_TIME);
        self.apex_threshold = self.apex_threshold.clamp(0.5, 1.0);
        self.apex_hang_time = self.apex_hang_time.max(0.0);
        self.gravity_on_release_multiplier = self.gravity_on_release_multiplier.max(0.01);
        self.gravity_on_ledge_fall = self.gravity_on_ledge_fall.max(0.01);

        self.adjusted_jump_height = self.jump_height * self.jump_height_compensation_factor;
        self.gravity =
            -(2.0 * self.adjusted_jump_height) / (self.time_till_jump_apex * self.time_till_jump_apex);
        self.initial_jump_velocity = self.gravity.abs() * self.time_till_jump_apex;
    }
}

impl Default for MovementParams {
    fn default() -> Self {
        let mut params = MovementParams {
            max_walk_speed: 12.5,
            ground_acceleration: 5.0,
            ground_deceleration: 20.0,
            air_acceleration: 5.0,
            air_deceleration: 5.0,
            ground_layer_mask: 1,
            jump_height: 6.5,
            jump_height_compensation_factor: 1.05,
            time_till_jump_apex: 0.4,
            gravity_on_release_multiplier: 2.0,
            gravity_on_ledge_fall: 2.0,
            max_fall_speed: 26.0,
            jumps_allowed: 2,
            time_for_upwards_cancel: 0.027,
            min_jump_cut_percent: 0.5,
            apex_threshold: 0.97,
            apex_hang_time: 0.075,
            jump_buffer_time: 0.125,
            jump_coyote_time: 0.125,
            adjusted_jump_height: 0.0,
            gravity: 0.0,
            initial_jump_velocity: 0.0,
        };
        params.finalize();
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn derives_gravity_and_launch_velocity_from_jump_shape() {
        let params = MovementParams::default();
        // jump_height 6.5 * compensation 1.05
        assert_close(params.adjusted_jump_height, 6.825);
        // -(2 * 6.825) / 0.4^2
        assert_close(params.gravity, -85.3125);
        // |gravity| * 0.4
        assert_close(params.initial_jump_velocity, 34.125);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut params = MovementParams::default();
        let (height, gravity, launch) = (
            params.adjusted_jump_height,
            params.gravity,
            params.initial_jump_velocity,
        );
        params.finalize();
        assert_eq!(height.to_bits(), params.adjusted_jump_height.to_bits());
        assert_eq!(gravity.to_bits(), params.gravity.to_bits());
        assert_eq!(launch.to_bits(), params.initial_jump_velocity.to_bits());
    }

    #[test]
    fn derived_values_track_raw_edits() {
        let mut params = MovementParams::default();
        params.jump_height = 10.0;
        params.finalize();
        assert_close(params.adjusted_jump_height, 10.5);
        assert_close(params.gravity, -131.25);
        assert_close(params.initial_jump_velocity, 52.5);
    }

    #[test]
    fn degenerate_durations_are_clamped_instead_of_dividing_by_zero() {
        let mut params = MovementParams::default();
        params.time_till_jump_apex = 0.0;
        params.time_for_upwards_cancel = 0.0;
        params.finalize();
        assert!(params.gravity.is_finite());
        assert!(params.initial_jump_velocity.is_finite());
        assert!(params.time_for_upwards_cancel > 0.0);
    }

    #[test]
    fn apex_threshold_is_kept_in_range() {
        let mut params = MovementParams::default();
        params.apex_threshold = 1.4;
        params.finalize();
        assert_eq!(params.apex_threshold, 1.0);
        params.apex_threshold = 0.2;
        params.finalize();
        assert_eq!(params.apex_threshold, 0.5);
    }
}
