//! Data-driven game feel
//!
//! Every number that shapes difficulty or pacing lives here. Values are
//! injected at construction and never mutated afterwards; `Default` carries
//! the hand-tuned constants. Missing fields in a JSON override fall back to
//! those defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_W, GROUND_Y};

/// One parallax backdrop layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerTuning {
    /// Fraction of the foreground scroll speed
    pub speed: f32,
    /// Number of buildings generated once per layer
    pub buildings: usize,
    /// Extra height range on top of the minimum building height
    pub max_height: f32,
    /// Draw opacity
    pub alpha: f32,
}

/// Runner physics, spawning and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_velocity: f32,
    /// Jumps available per ground contact
    pub jump_charges: u8,
    pub player_x: f32,
    pub player_w: f32,
    pub player_h: f32,
    /// Hitbox shrink from the sprite bounds (left/right/top)
    pub hitbox_inset: f32,
    pub ground_y: f32,
    pub initial_speed: f32,
    /// Speed gained per frame while playing (uncapped)
    pub speed_increment: f32,
    /// Distance before the first obstacle of a run
    pub first_spawn_distance: f32,
    pub spawn_gap_min: f32,
    pub spawn_gap_max: f32,
    /// A roll above this spawns a ground-crawler, otherwise a spike row
    pub crawler_threshold: f32,
    pub crawler_size: (f32, f32),
    pub spike_size: (f32, f32),
    /// Obstacles at or left of `-cleanup_margin` are dropped
    pub cleanup_margin: f32,
    /// Frames between run-animation leg swaps
    pub run_frame_period: f32,
    /// Seconds the player flashes after a hit
    pub hit_flash_secs: f32,
    /// Parallax offsets wrap at this distance
    pub parallax_wrap: f32,
    /// Ground texture repeats every this many units
    pub ground_texture_period: f32,
    pub layers: Vec<LayerTuning>,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_velocity: -12.0,
            jump_charges: 2,
            player_x: 60.0,
            player_w: 20.0,
            player_h: 30.0,
            hitbox_inset: 4.0,
            ground_y: GROUND_Y,
            initial_speed: 4.0,
            speed_increment: 0.001,
            first_spawn_distance: 200.0,
            spawn_gap_min: 90.0,
            spawn_gap_max: 160.0,
            crawler_threshold: 0.4,
            crawler_size: (20.0, 15.0),
            spike_size: (32.0, 14.0),
            cleanup_margin: 50.0,
            run_frame_period: 8.0,
            hit_flash_secs: 0.6,
            parallax_wrap: CANVAS_W * 3.0,
            ground_texture_period: 20.0,
            layers: vec![
                LayerTuning {
                    speed: 0.3,
                    buildings: 30,
                    max_height: 80.0,
                    alpha: 0.15,
                },
                LayerTuning {
                    speed: 0.6,
                    buildings: 25,
                    max_height: 50.0,
                    alpha: 0.25,
                },
            ],
        }
    }
}

impl RunnerTuning {
    /// Player y when standing on the ground
    pub fn standing_y(&self) -> f32 {
        self.ground_y - self.player_h
    }

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Tile reveal pacing and asset geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTuning {
    pub rows: usize,
    pub cols: usize,
    /// Gap between consecutive tile flips (ms)
    pub flip_delay_ms: f64,
    /// Pause after the last flip before the grid is marked complete (ms)
    pub settle_delay_ms: f64,
    /// Pause after completion before the start control appears (ms)
    pub start_delay_ms: f64,
    /// Native size of the character illustration
    pub asset_width: f32,
    pub asset_height: f32,
}

impl Default for RevealTuning {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            flip_delay_ms: 250.0,
            settle_delay_ms: 250.0,
            start_delay_ms: 600.0,
            asset_width: 350.0,
            asset_height: 430.0,
        }
    }
}

/// Puzzle gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleTuning {
    /// Cells that must be selected, and nothing else
    pub secret: Vec<u8>,
    /// Cells are numbered `1..=cells`
    pub cells: u8,
    pub success_delay_ms: f64,
    pub shake_ms: f64,
    pub denied_ms: f64,
}

impl Default for PuzzleTuning {
    fn default() -> Self {
        Self {
            secret: vec![3, 6, 10, 13],
            cells: 16,
            success_delay_ms: 500.0,
            shake_ms: 500.0,
            denied_ms: 2000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = RunnerTuning::from_json(r#"{ "gravity": 0.8 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.jump_velocity, -12.0);
        assert_eq!(tuning.layers.len(), 2);
    }

    #[test]
    fn test_standing_y() {
        let tuning = RunnerTuning::default();
        assert_eq!(tuning.standing_y(), 310.0);
    }

    #[test]
    fn test_reveal_defaults_complete_after_seventeen_delays() {
        let t = RevealTuning::default();
        let cells = (t.rows * t.cols) as f64;
        assert_eq!(cells * t.flip_delay_ms + t.settle_delay_ms, 4250.0);
    }
}
