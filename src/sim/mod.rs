//! Runner simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Frame-normalized steps only (real deltas are clamped first)
//! - Randomness comes from the caller's RNG
//! - The renderer only ever reads `RunnerState`

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, first_hit, obstacle_hitbox, player_hitbox};
pub use state::{
    Building, Mode, Obstacle, ObstacleKind, ParallaxLayer, Player, RunnerEvent, RunnerState,
};
pub use tick::{Action, TickInput, apply_action, tick};
