//! The gate in front of the runner
//!
//! Three screens shown in order: puzzle, reveal, game. Each screen only
//! signals "done"; the flow decides what comes next.

pub mod puzzle;
pub mod reveal;

pub use puzzle::{PuzzleEvent, UnlockPuzzle, Verdict};
pub use reveal::{RevealEvent, RevealSequencer, TILE_FRONT, TileSlice, spiral_order};

/// Which screen of the secret page is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Puzzle,
    Reveal,
    Game,
    /// The player followed the back link
    Left,
}

#[derive(Debug, Default)]
pub struct ScreenFlow {
    screen: Screen,
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Puzzle solved. Returns the new screen if the flow moved.
    pub fn unlocked(&mut self) -> Option<Screen> {
        self.advance(Screen::Puzzle, Screen::Reveal)
    }

    /// Start pressed on the reveal screen
    pub fn revealed(&mut self) -> Option<Screen> {
        self.advance(Screen::Reveal, Screen::Game)
    }

    /// Back link followed from any screen
    pub fn leave(&mut self) -> Option<Screen> {
        if self.screen == Screen::Left {
            return None;
        }
        log::info!("Leaving secret page from {:?}", self.screen);
        self.screen = Screen::Left;
        Some(Screen::Left)
    }

    fn advance(&mut self, from: Screen, to: Screen) -> Option<Screen> {
        if self.screen != from {
            return None;
        }
        log::info!("Screen {:?} -> {:?}", from, to);
        self.screen = to;
        Some(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_is_strictly_ordered() {
        let mut flow = ScreenFlow::new();
        assert_eq!(flow.revealed(), None);
        assert_eq!(flow.unlocked(), Some(Screen::Reveal));
        assert_eq!(flow.unlocked(), None);
        assert_eq!(flow.revealed(), Some(Screen::Game));
        assert_eq!(flow.leave(), Some(Screen::Left));
        assert_eq!(flow.leave(), None);
        assert_eq!(flow.unlocked(), None);
    }
}
