//! Player vs wall collision
//!
//! The player never moves radially, so a hit is a 1D overlap test along the
//! radius plus an exact segment match.

use super::state::{Player, Wall};

/// Whether the wall's band overlaps the player dot along the radius
#[inline]
pub fn overlaps_radially(player: &Player, wall: &Wall, wall_thickness: f32) -> bool {
    (wall.radius - player.radius).abs() < wall_thickness / 2.0 + player.size
}

/// Index of the first wall hitting the player, if any
///
/// Returns `None` while the player is invulnerable. Only the first hit is
/// reported so simultaneous overlaps never stack damage.
pub fn check_collision(player: &Player, walls: &[Wall], wall_thickness: f32) -> Option<usize> {
    if player.is_invulnerable() {
        return None;
    }

    walls.iter().position(|wall| {
        wall.segment == player.segment && overlaps_radially(player, wall, wall_thickness)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&Tuning::default())
    }

    fn wall(segment: u8, radius: f32) -> Wall {
        Wall {
            segment,
            radius,
            color: 0,
        }
    }

    #[test]
    fn test_hit_on_same_segment() {
        let p = player();
        assert_eq!(check_collision(&p, &[wall(0, 45.0)], 15.0), Some(0));
    }

    #[test]
    fn test_no_hit_on_other_segment() {
        let p = player();
        assert_eq!(check_collision(&p, &[wall(1, 45.0), wall(5, 45.0)], 15.0), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let p = player();
        // threshold = 15/2 + 8 = 15.5
        assert!(check_collision(&p, &[wall(0, 45.0 + 15.49)], 15.0).is_some());
        assert!(check_collision(&p, &[wall(0, 45.0 + 15.5)], 15.0).is_none());
        assert!(check_collision(&p, &[wall(0, 45.0 - 15.5)], 15.0).is_none());
        assert!(check_collision(&p, &[wall(0, 45.0 - 15.49)], 15.0).is_some());
    }

    #[test]
    fn test_invulnerable_suppresses_hit() {
        let mut p = player();
        p.invulnerable = 1;
        assert_eq!(check_collision(&p, &[wall(0, 45.0)], 15.0), None);
    }

    #[test]
    fn test_first_qualifying_wall_wins() {
        let p = player();
        let walls = [wall(3, 45.0), wall(0, 50.0), wall(0, 45.0)];
        assert_eq!(check_collision(&p, &walls, 15.0), Some(1));
    }

    proptest! {
        #[test]
        fn prop_hit_iff_rule(
            radius in 0.0f32..120.0,
            wall_segment in 0u8..6,
            player_segment in 0u8..6,
            invulnerable in 0u32..3,
        ) {
            let mut p = player();
            p.segment = player_segment;
            p.invulnerable = invulnerable;
            let w = wall(wall_segment, radius);
            let expected = (radius - p.radius).abs() < 15.0 / 2.0 + p.size
                && wall_segment == player_segment
                && invulnerable == 0;
            prop_assert_eq!(check_collision(&p, &[w], 15.0).is_some(), expected);
        }
    }
}
