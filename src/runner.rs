//! Runner driver
//!
//! Owns the simulation state, its random source and the high-score store.
//! The shell calls `frame` once per animation frame; rendering reads
//! `state()` afterwards.

use rand::Rng;

use crate::highscores::HighScoreStore;
use crate::persistence::KeyValueStore;
use crate::sim::{Mode, RunnerEvent, RunnerState, TickInput, tick};
use crate::tuning::RunnerTuning;

pub struct Runner<S, R> {
    state: RunnerState,
    rng: R,
    scores: HighScoreStore<S>,
    torn_down: bool,
}

impl<S: KeyValueStore, R: Rng> Runner<S, R> {
    /// Mount: read the stored high score and lay out the skyline
    pub fn new(tuning: RunnerTuning, store: S, mut rng: R) -> Self {
        let scores = HighScoreStore::load(store);
        let state = RunnerState::new(tuning, scores.best(), &mut rng);
        Self {
            state,
            rng,
            scores,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn high_scores(&self) -> &HighScoreStore<S> {
        &self.scores
    }

    /// Advance one frame. `press` is true when a jump key, tap or click
    /// arrived since the last frame.
    pub fn frame(&mut self, dt: f32, press: bool) -> Vec<RunnerEvent> {
        if self.torn_down {
            return Vec::new();
        }
        let events = tick(&mut self.state, &TickInput { press }, dt, &mut self.rng);
        for event in &events {
            if let RunnerEvent::GameOver {
                score,
                new_high_score: true,
            } = *event
            {
                self.scores.submit(score);
            }
        }
        events
    }

    /// Unmount. Every later `frame` call is a no-op.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            log::debug!("Runner torn down in {:?}", self.state.mode);
        }
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Obstacle, ObstacleKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const KEY: &str = HighScoreStore::<MemoryStore>::STORAGE_KEY;
    const DT: f32 = 1.0 / 60.0;

    /// Play a little, jump the score to just under 137, then drop a crawler
    /// onto the player so the next frame ends the run at 137
    fn crash_at_137(stored: &str) -> Runner<MemoryStore, Pcg32> {
        let tuning = RunnerTuning {
            // Keep the lane clear until the planted obstacle
            first_spawn_distance: f32::MAX,
            ..RunnerTuning::default()
        };
        let mut runner = Runner::new(tuning, MemoryStore::with(KEY, stored), Pcg32::seed_from_u64(3));
        runner.frame(DT, true);
        for _ in 0..20 {
            runner.frame(DT, false);
        }
        runner.state.score = 136.25;
        let x = runner.state().player.pos.x;
        let tuning = runner.state().tuning().clone();
        runner
            .state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Crawler, x, &tuning));
        let events = runner.frame(DT, false);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, RunnerEvent::GameOver { score: 137, .. })),
            "expected game over, got {:?}",
            events
        );
        runner
    }

    #[test]
    fn test_improved_score_is_persisted() {
        let runner = crash_at_137("100");
        assert_eq!(runner.mode(), Mode::GameOver);
        assert_eq!(runner.high_scores().best(), 137);
        assert_eq!(runner.high_scores().store().raw(KEY), Some("137"));
    }

    #[test]
    fn test_lower_score_leaves_stored_value() {
        let runner = crash_at_137("200");
        assert_eq!(runner.high_scores().best(), 200);
        assert_eq!(runner.high_scores().store().raw(KEY), Some("200"));
        assert_eq!(runner.high_scores().store().writes(), 0);
    }

    #[test]
    fn test_frames_after_teardown_do_nothing() {
        let mut runner = Runner::new(
            RunnerTuning::default(),
            MemoryStore::new(),
            Pcg32::seed_from_u64(11),
        );
        runner.frame(DT, true);
        for _ in 0..30 {
            runner.frame(DT, false);
        }
        runner.teardown();
        let before = runner.state().clone();

        for i in 0..10_000 {
            assert!(runner.frame(DT, i % 7 == 0).is_empty());
        }
        let after = runner.state();
        assert_eq!(after.score, before.score);
        assert_eq!(after.frames, before.frames);
        assert_eq!(after.player.pos, before.player.pos);
        assert_eq!(after.obstacles, before.obstacles);
        assert_eq!(runner.high_scores().store().writes(), 0);
    }
}
