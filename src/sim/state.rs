//! Runner state and core simulation types
//!
//! Everything the renderer reads lives here. Per-run fields are rebuilt by
//! `reset`; the high score and the generated skyline outlive every run.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::{LayerTuning, RunnerTuning};

/// Current mode of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Title overlay, waiting for the first press
    #[default]
    Idle,
    /// Active run
    Playing,
    /// Run ended; waiting for a retry press
    GameOver,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the sprite; x never changes
    pub pos: Vec2,
    /// Vertical velocity per frame (negative is up)
    pub vy: f32,
    /// Jumps left before the next ground contact
    pub jump_charges: u8,
    /// Run animation frame (0 or 1)
    pub frame: u8,
    /// Frames since the last leg swap
    pub frame_timer: f32,
    /// Seconds of hit flash remaining
    pub hit_timer: f32,
}

impl Player {
    pub fn new(tuning: &RunnerTuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_x, tuning.standing_y()),
            vy: 0.0,
            jump_charges: tuning.jump_charges,
            frame: 0,
            frame_timer: 0.0,
            hit_timer: 0.0,
        }
    }

    /// Standing on (or within a unit of) the ground
    pub fn on_ground(&self, tuning: &RunnerTuning) -> bool {
        self.pos.y >= tuning.standing_y() - 1.0
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Hard-hat walker
    Crawler,
    /// Row of floor spikes
    SpikeRow,
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    pub kind: ObstacleKind,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, tuning: &RunnerTuning) -> Self {
        let (width, height) = match kind {
            ObstacleKind::Crawler => tuning.crawler_size,
            ObstacleKind::SpikeRow => tuning.spike_size,
        };
        Self {
            x,
            kind,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A backdrop rectangle standing on the ground line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

/// A scrolling skyline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxLayer {
    /// Accumulated scroll distance, wrapped
    pub offset: f32,
    /// Fraction of the foreground speed
    pub speed: f32,
    pub alpha: f32,
    pub buildings: Vec<Building>,
}

impl ParallaxLayer {
    /// Lay out a random skyline once; it is reused for every run
    pub fn generate<R: Rng + ?Sized>(layer: &LayerTuning, rng: &mut R) -> Self {
        let mut buildings = Vec::with_capacity(layer.buildings);
        let mut cx = 0.0;
        for _ in 0..layer.buildings {
            let width = 30.0 + rng.random::<f32>() * 60.0;
            let height = 30.0 + rng.random::<f32>() * layer.max_height;
            buildings.push(Building {
                x: cx,
                width,
                height,
            });
            cx += width + 10.0 + rng.random::<f32>() * 30.0;
        }
        Self {
            offset: 0.0,
            speed: layer.speed,
            alpha: layer.alpha,
            buildings,
        }
    }
}

/// Events emitted by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunnerEvent {
    RunStarted,
    Jumped { charges_left: u8 },
    ObstacleSpawned(ObstacleKind),
    /// The run ended on a collision
    GameOver { score: u64, new_high_score: bool },
}

/// Complete runner state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerState {
    pub mode: Mode,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Distance travelled this run, in frames
    pub score: f32,
    /// Best floored score across sessions
    pub high_score: u64,
    pub game_speed: f32,
    /// Distance left until the next spawn
    pub next_obstacle: f32,
    pub layers: Vec<ParallaxLayer>,
    /// Ground texture scroll, wrapped to its period
    pub ground_offset: f32,
    /// Simulation frames advanced this run
    pub frames: u64,
    #[serde(skip)]
    pub(super) tuning: RunnerTuning,
}

impl RunnerState {
    /// Fresh idle state. The skyline is generated here and kept for good.
    pub fn new<R: Rng + ?Sized>(tuning: RunnerTuning, high_score: u64, rng: &mut R) -> Self {
        let layers = tuning
            .layers
            .iter()
            .map(|l| ParallaxLayer::generate(l, rng))
            .collect();
        Self {
            mode: Mode::Idle,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            score: 0.0,
            high_score,
            game_speed: tuning.initial_speed,
            next_obstacle: tuning.first_spawn_distance,
            layers,
            ground_offset: 0.0,
            frames: 0,
            tuning,
        }
    }

    pub fn tuning(&self) -> &RunnerTuning {
        &self.tuning
    }

    /// Reset every per-run field. High score and skyline survive.
    pub fn reset(&mut self) {
        self.player = Player::new(&self.tuning);
        self.obstacles.clear();
        self.score = 0.0;
        self.game_speed = self.tuning.initial_speed;
        self.next_obstacle = self.tuning.first_spawn_distance;
        self.ground_offset = 0.0;
        self.frames = 0;
        for layer in &mut self.layers {
            layer.offset = 0.0;
        }
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn on_ground(&self) -> bool {
        self.player.on_ground(&self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_state_is_idle_and_grounded() {
        let mut rng = Pcg32::seed_from_u64(7);
        let state = RunnerState::new(RunnerTuning::default(), 42, &mut rng);
        assert_eq!(state.mode, Mode::Idle);
        assert_eq!(state.high_score, 42);
        assert!(state.on_ground());
        assert_eq!(state.player.jump_charges, 2);
        assert_eq!(state.layers.len(), 2);
        assert_eq!(state.layers[0].buildings.len(), 30);
        assert_eq!(state.layers[1].buildings.len(), 25);
    }

    #[test]
    fn test_skyline_is_ordered_and_bounded() {
        let mut rng = Pcg32::seed_from_u64(99);
        let tuning = RunnerTuning::default();
        let layer = ParallaxLayer::generate(&tuning.layers[0], &mut rng);
        for pair in layer.buildings.windows(2) {
            assert!(pair[1].x >= pair[0].x + pair[0].width + 10.0 - 1e-3);
        }
        for b in &layer.buildings {
            assert!((30.0..=90.0).contains(&b.width));
            assert!((30.0..=110.0).contains(&b.height));
        }
    }

    #[test]
    fn test_reset_keeps_high_score_and_skyline() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = RunnerState::new(RunnerTuning::default(), 10, &mut rng);
        let skyline = state.layers[0].buildings.clone();
        state.score = 55.0;
        state.game_speed = 9.0;
        state.layers[0].offset = 123.0;
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Crawler, 300.0, state.tuning()));

        state.reset();
        assert_eq!(state.score, 0.0);
        assert_eq!(state.game_speed, 4.0);
        assert_eq!(state.next_obstacle, 200.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.layers[0].offset, 0.0);
        assert_eq!(state.layers[0].buildings, skyline);
        assert_eq!(state.high_score, 10);
    }
}
