//! Axis-aligned hitboxes for the runner
//!
//! Canvas coordinates: x grows right, y grows down, ground at `ground_y`.

use glam::Vec2;

use super::state::{Obstacle, Player};
use crate::tuning::RunnerTuning;

/// Axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Player hitbox: inset from the sprite on the left, right and top.
///
/// The feet stay at the sprite bottom so landing on a spike still counts.
pub fn player_hitbox(player: &Player, tuning: &RunnerTuning) -> Aabb {
    let inset = tuning.hitbox_inset;
    Aabb::new(
        player.pos.x + inset,
        player.pos.y + inset,
        tuning.player_w - inset * 2.0,
        tuning.player_h - inset,
    )
}

/// Obstacles stand on the ground line
pub fn obstacle_hitbox(obstacle: &Obstacle, ground_y: f32) -> Aabb {
    Aabb::new(
        obstacle.x,
        ground_y - obstacle.height,
        obstacle.width,
        obstacle.height,
    )
}

/// First obstacle overlapping the player, if any
pub fn first_hit<'a>(
    player: &Player,
    obstacles: &'a [Obstacle],
    tuning: &RunnerTuning,
) -> Option<&'a Obstacle> {
    let hitbox = player_hitbox(player, tuning);
    obstacles
        .iter()
        .find(|o| hitbox.overlaps(&obstacle_hitbox(o, tuning.ground_y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    fn grounded_player(tuning: &RunnerTuning) -> Player {
        Player::new(tuning)
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_player_hitbox_is_inset() {
        let tuning = RunnerTuning::default();
        let hb = player_hitbox(&grounded_player(&tuning), &tuning);
        assert_eq!(hb.min, Vec2::new(64.0, 314.0));
        assert_eq!(hb.size, Vec2::new(12.0, 26.0));
        assert_eq!(hb.max().y, tuning.ground_y);
    }

    #[test]
    fn test_obstacle_under_player_hits() {
        let tuning = RunnerTuning::default();
        let player = grounded_player(&tuning);
        let crawler = Obstacle::new(ObstacleKind::Crawler, 70.0, &tuning);
        assert!(first_hit(&player, std::slice::from_ref(&crawler), &tuning).is_some());
    }

    #[test]
    fn test_sprite_edge_graze_does_not_hit() {
        let tuning = RunnerTuning::default();
        let player = grounded_player(&tuning);
        // Overlaps the drawn sprite (x 60..80) but not the inset hitbox (64..76)
        let spike = Obstacle::new(ObstacleKind::SpikeRow, 76.0, &tuning);
        assert!(first_hit(&player, std::slice::from_ref(&spike), &tuning).is_none());
    }

    #[test]
    fn test_high_jump_clears_obstacle() {
        let tuning = RunnerTuning::default();
        let mut player = grounded_player(&tuning);
        player.pos.y = 250.0;
        let crawler = Obstacle::new(ObstacleKind::Crawler, 60.0, &tuning);
        assert!(first_hit(&player, std::slice::from_ref(&crawler), &tuning).is_none());
    }
}
