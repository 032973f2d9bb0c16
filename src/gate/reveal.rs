//! Spiral tile reveal
//!
//! A 4×4 grid of face-down tiles flips over one tile at a time, peeling the
//! grid from the outside in. Each tile's back face shows its slice of the
//! character illustration.

use crate::schedule::Schedule;
use crate::tuning::RevealTuning;

/// Spiral traversal of a `rows × cols` grid as row-major indices.
///
/// Peels rings clockwise from the top-left corner: top row left to right,
/// right column downward, bottom row right to left, left column upward.
pub fn spiral_order(rows: usize, cols: usize) -> Vec<usize> {
    let total = rows * cols;
    let mut order = Vec::with_capacity(total);
    if total == 0 {
        return order;
    }

    // Signed bounds: they cross over on the innermost ring
    let (mut top, mut bottom) = (0isize, rows as isize - 1);
    let (mut left, mut right) = (0isize, cols as isize - 1);
    let index = |r: isize, c: isize| r as usize * cols + c as usize;

    while order.len() < total {
        let mut c = left;
        while c <= right && order.len() < total {
            order.push(index(top, c));
            c += 1;
        }
        top += 1;

        let mut r = top;
        while r <= bottom && order.len() < total {
            order.push(index(r, right));
            r += 1;
        }
        right -= 1;

        let mut c = right;
        while c >= left && order.len() < total {
            order.push(index(bottom, c));
            c -= 1;
        }
        bottom -= 1;

        let mut r = bottom;
        while r >= top && order.len() < total {
            order.push(index(r, left));
            r -= 1;
        }
        left += 1;
    }

    order
}

/// Face shown on a tile until it flips
pub const TILE_FRONT: &str = "?";

/// Where a tile sits and which slice of the asset it shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSlice {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub width: f32,
    pub height: f32,
    /// Asset offset so the tile window shows its own slice (always <= 0)
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealStep {
    /// Flip the k-th tile of the spiral (0-based)
    Flip(usize),
    Complete,
    EnableStart,
}

/// Events surfaced by [`RevealSequencer::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    TileFlipped { index: usize },
    /// Every tile is face up; the grid starts glowing
    Completed,
    /// The start control is now usable
    StartEnabled,
}

pub struct RevealSequencer {
    tuning: RevealTuning,
    order: Vec<usize>,
    flipped: Vec<bool>,
    flipped_count: usize,
    activated: bool,
    complete: bool,
    start_enabled: bool,
    started: bool,
    timers: Schedule<RevealStep>,
}

impl RevealSequencer {
    pub fn new(tuning: RevealTuning) -> Self {
        let order = spiral_order(tuning.rows, tuning.cols);
        let flipped = vec![false; order.len()];
        Self {
            tuning,
            order,
            flipped,
            flipped_count: 0,
            activated: false,
            complete: false,
            start_enabled: false,
            started: false,
            timers: Schedule::new(),
        }
    }

    /// Schedule every flip plus the completion and start-enable steps.
    ///
    /// Flip `k` (1-based) fires at `now + k * flip_delay`. Calling twice is a no-op.
    pub fn activate(&mut self, now: f64) {
        if self.activated || self.timers.is_torn_down() {
            return;
        }
        self.activated = true;

        let delay = self.tuning.flip_delay_ms;
        for k in 0..self.order.len() {
            self.timers
                .after(now, (k + 1) as f64 * delay, RevealStep::Flip(k));
        }
        let all_flipped = self.order.len() as f64 * delay;
        let complete_at = all_flipped + self.tuning.settle_delay_ms;
        self.timers.after(now, complete_at, RevealStep::Complete);
        self.timers.after(
            now,
            complete_at + self.tuning.start_delay_ms,
            RevealStep::EnableStart,
        );
        log::info!("Reveal started ({} tiles)", self.order.len());
    }

    /// Apply every step due at `now`, in schedule order
    pub fn update(&mut self, now: f64) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        for step in self.timers.poll(now) {
            match step {
                RevealStep::Flip(k) => {
                    let index = self.order[k];
                    if !self.flipped[index] {
                        self.flipped[index] = true;
                        self.flipped_count += 1;
                        events.push(RevealEvent::TileFlipped { index });
                    }
                }
                RevealStep::Complete => {
                    if !self.complete {
                        self.complete = true;
                        log::info!("Reveal complete");
                        events.push(RevealEvent::Completed);
                    }
                }
                RevealStep::EnableStart => {
                    self.start_enabled = true;
                    events.push(RevealEvent::StartEnabled);
                }
            }
        }
        events
    }

    /// Press the start control. True exactly once, and only after it is enabled.
    pub fn start(&mut self) -> bool {
        if !self.start_enabled || self.started || self.timers.is_torn_down() {
            return false;
        }
        self.started = true;
        true
    }

    /// Cancel every pending step
    pub fn teardown(&mut self) {
        self.timers.teardown();
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_flipped(&self, index: usize) -> bool {
        self.flipped.get(index).copied().unwrap_or(false)
    }

    pub fn flipped_count(&self) -> usize {
        self.flipped_count
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_start_enabled(&self) -> bool {
        self.start_enabled
    }

    pub fn tile_count(&self) -> usize {
        self.order.len()
    }

    /// Tile geometry for slicing the character asset
    pub fn tile(&self, index: usize) -> TileSlice {
        let cols = self.tuning.cols.max(1);
        let rows = self.tuning.rows.max(1);
        let width = self.tuning.asset_width / cols as f32;
        let height = self.tuning.asset_height / rows as f32;
        let row = index / cols;
        let col = index % cols;
        TileSlice {
            index,
            row,
            col,
            width,
            height,
            offset_x: -(col as f32) * width,
            offset_y: -(row as f32) * height,
        }
    }

    pub fn tuning(&self) -> &RevealTuning {
        &self.tuning
    }
}
