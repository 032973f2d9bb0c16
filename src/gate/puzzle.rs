//! Grid password puzzle
//!
//! Sixteen numbered cells; the gate opens when exactly the secret cells are
//! selected. Purely cosmetic: no attempt limit, no lockout.

use std::collections::BTreeSet;

use crate::schedule::{Schedule, TimerId};
use crate::tuning::PuzzleTuning;

/// Outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Denied,
    /// Already accepted; the unlock is in flight
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PuzzleTimer {
    Unlock,
    StopShake,
    ClearDenied,
}

/// Events surfaced by [`UnlockPuzzle::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleEvent {
    /// The success delay elapsed; move on to the reveal
    Unlocked,
    ShakeEnded,
    DeniedCleared,
}

pub struct UnlockPuzzle {
    tuning: PuzzleTuning,
    secret: BTreeSet<u8>,
    selected: BTreeSet<u8>,
    denied: bool,
    shaking: bool,
    /// White flash while the unlock is pending
    flashing: bool,
    unlocked: bool,
    clear_denied: Option<TimerId>,
    stop_shake: Option<TimerId>,
    timers: Schedule<PuzzleTimer>,
}

impl UnlockPuzzle {
    pub fn new(tuning: PuzzleTuning) -> Self {
        let secret = tuning.secret.iter().copied().collect();
        Self {
            tuning,
            secret,
            selected: BTreeSet::new(),
            denied: false,
            shaking: false,
            flashing: false,
            unlocked: false,
            clear_denied: None,
            stop_shake: None,
            timers: Schedule::new(),
        }
    }

    /// Cell ids shown to the player, `1..=cells`
    pub fn cells(&self) -> impl Iterator<Item = u8> {
        1..=self.tuning.cells
    }

    /// Text printed on a cell's button
    pub fn cell_label(cell: u8) -> String {
        cell.to_string()
    }

    pub fn is_selected(&self, cell: u8) -> bool {
        self.selected.contains(&cell)
    }

    pub fn selected(&self) -> &BTreeSet<u8> {
        &self.selected
    }

    pub fn is_denied(&self) -> bool {
        self.denied
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    /// Flip one cell in or out of the selection and clear the denied banner.
    ///
    /// Returns the new selection state of the cell, `None` if ignored.
    pub fn toggle(&mut self, cell: u8) -> Option<bool> {
        if self.flashing || self.timers.is_torn_down() {
            return None;
        }
        if !(1..=self.tuning.cells).contains(&cell) {
            log::warn!("Ignoring toggle of unknown cell {}", cell);
            return None;
        }

        self.set_denied(false);
        if self.selected.remove(&cell) {
            Some(false)
        } else {
            self.selected.insert(cell);
            Some(true)
        }
    }

    /// Set equality against the secret: same size and every pick is secret
    pub fn matches(&self) -> bool {
        self.selected.len() == self.secret.len()
            && self.selected.iter().all(|c| self.secret.contains(c))
    }

    /// Check the selection. The selection is kept on failure.
    pub fn submit(&mut self, now: f64) -> Verdict {
        if self.flashing || self.timers.is_torn_down() {
            return Verdict::Ignored;
        }

        if self.matches() {
            log::info!("Puzzle solved");
            self.flashing = true;
            self.set_denied(false);
            self.timers
                .after(now, self.tuning.success_delay_ms, PuzzleTimer::Unlock);
            return Verdict::Accepted;
        }

        log::info!("Puzzle denied ({} cells selected)", self.selected.len());
        self.denied = true;
        self.shaking = true;
        if let Some(id) = self.stop_shake.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.clear_denied.take() {
            self.timers.cancel(id);
        }
        self.stop_shake = self
            .timers
            .after(now, self.tuning.shake_ms, PuzzleTimer::StopShake);
        self.clear_denied = self
            .timers
            .after(now, self.tuning.denied_ms, PuzzleTimer::ClearDenied);
        Verdict::Denied
    }

    /// Run due timers and report what changed. Empty when nothing is visible
    /// to redraw; `Unlocked` comes exactly once per puzzle.
    pub fn update(&mut self, now: f64) -> Vec<PuzzleEvent> {
        let mut events = Vec::new();
        for timer in self.timers.poll(now) {
            match timer {
                PuzzleTimer::StopShake => {
                    self.shaking = false;
                    self.stop_shake = None;
                    events.push(PuzzleEvent::ShakeEnded);
                }
                PuzzleTimer::ClearDenied => {
                    self.denied = false;
                    self.clear_denied = None;
                    events.push(PuzzleEvent::DeniedCleared);
                }
                PuzzleTimer::Unlock => {
                    if !self.unlocked {
                        self.unlocked = true;
                        events.push(PuzzleEvent::Unlocked);
                    }
                }
            }
        }
        events
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Cancel pending timers; the puzzle is inert afterwards
    pub fn teardown(&mut self) {
        self.timers.teardown();
        self.clear_denied = None;
        self.stop_shake = None;
    }

    fn set_denied(&mut self, denied: bool) {
        self.denied = denied;
        if !denied {
            if let Some(id) = self.clear_denied.take() {
                self.timers.cancel(id);
            }
        }
    }
}
