use bevy::math::Vec2;
use bevy::prelude::{Entity, Query};
use bevy_rapier2d::geometry::CollisionGroups;
use bevy_rapier2d::plugin::RapierContext;

/// Ground/ceiling flags for one fixed tick, computed from the physics body's
/// current contact set. The controller treats this as an opaque boolean pair.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ContactState {
    pub is_grounded: bool,
    pub bumped_head: bool,
}

// Surface-normal angle bands, in degrees counterclockwise from +X.
// A floor pushes the player straight up (90); a ceiling pushes straight down (270).
const GROUND_BAND: (f32, f32) = (45.0, 135.0);
const CEILING_BAND: (f32, f32) = (225.0, 315.0);

/// Classify a single contact by its surface normal, oriented to point from
/// the surface towards the player.
pub fn classify_normal(normal: Vec2) -> ContactState {
    let mut angle = normal.y.atan2(normal.x).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    ContactState {
        is_grounded: angle >= GROUND_BAND.0 && angle <= GROUND_BAND.1,
        bumped_head: angle >= CEILING_BAND.0 && angle <= CEILING_BAND.1,
    }
}

/// Sample the rapier contact graph for the player's body, filtered to
/// colliders whose group memberships intersect `ground_mask`.
pub fn sense_contacts(
    rapier_context: &RapierContext,
    player_entity: Entity,
    ground_mask: u32,
    collision_groups: &Query<&CollisionGroups>,
) -> ContactState {
    let mut contacts = ContactState::default();

    for pair in rapier_context.contact_pairs_with(player_entity) {
        if !pair.has_any_active_contact() {
            continue;
        }

        let player_is_first = pair.collider1() == player_entity;
        let other = if player_is_first {
            pair.collider2()
        } else {
            pair.collider1()
        };

        // colliders without an explicit group belong to every layer
        let other_memberships = collision_groups
            .get(other)
            .map(|groups| groups.memberships.bits())
            .unwrap_or(u32::MAX);
        if other_memberships & ground_mask == 0 {
            continue;
        }

        for manifold in pair.manifolds() {
            // rapier reports the manifold normal pointing away from the
            // first collider; orient it to point towards the player
            let normal = if player_is_first {
                -manifold.normal()
            } else {
                manifold.normal()
            };
            let sample = classify_normal(normal);
            contacts.is_grounded |= sample.is_grounded;
            contacts.bumped_head |= sample.bumped_head;
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_normals_count_as_grounded() {
        assert!(classify_normal(Vec2::Y).is_grounded);
        // steep slope, still inside the upward-facing band
        assert!(classify_normal(Vec2::new(0.6, 0.8)).is_grounded);
        assert!(!classify_normal(Vec2::Y).bumped_head);
    }

    #[test]
    fn ceiling_normals_count_as_head_bump() {
        let sample = classify_normal(-Vec2::Y);
        assert!(sample.bumped_head);
        assert!(!sample.is_grounded);
    }

    #[test]
    fn wall_normals_are_neither() {
        for normal in [Vec2::X, -Vec2::X] {
            let sample = classify_normal(normal);
            assert!(!sample.is_grounded);
            assert!(!sample.bumped_head);
        }
    }
}
