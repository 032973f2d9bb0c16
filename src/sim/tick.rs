//! Per-frame runner update
//!
//! Advances the simulation by one frame of real time. Tuning constants are
//! expressed per 1/60 s frame, so the real delta is clamped and converted to
//! a frame-normalized step first.

use rand::Rng;

use super::collision::first_hit;
use super::state::{Mode, Obstacle, ObstacleKind, RunnerEvent, RunnerState};
use crate::consts::CANVAS_W;
use crate::frame_step;

/// Player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the title screen
    Start,
    Jump,
    /// Play again after a game over
    Restart,
}

impl Action {
    /// What a single press (key, tap, click) means in the given mode
    pub fn contextual(mode: Mode) -> Self {
        match mode {
            Mode::Idle => Action::Start,
            Mode::Playing => Action::Jump,
            Mode::GameOver => Action::Restart,
        }
    }
}

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key, tap or click
    pub press: bool,
}

/// Apply one action. Actions that make no sense in the current mode are ignored.
pub fn apply_action(state: &mut RunnerState, action: Action) -> Option<RunnerEvent> {
    match (action, state.mode) {
        (Action::Start, Mode::Idle) | (Action::Restart, Mode::GameOver) => {
            state.reset();
            state.mode = Mode::Playing;
            log::info!("Run started (best {})", state.high_score);
            Some(RunnerEvent::RunStarted)
        }
        (Action::Jump, Mode::Playing) => {
            let player = &mut state.player;
            if player.jump_charges == 0 {
                return None;
            }
            player.vy = state.tuning.jump_velocity;
            player.jump_charges -= 1;
            Some(RunnerEvent::Jumped {
                charges_left: player.jump_charges,
            })
        }
        _ => None,
    }
}

/// Advance the runner by `dt` seconds of real time
pub fn tick<R: Rng + ?Sized>(
    state: &mut RunnerState,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> Vec<RunnerEvent> {
    let mut events = Vec::new();

    if input.press {
        events.extend(apply_action(state, Action::contextual(state.mode)));
    }

    match state.mode {
        Mode::Idle => return events,
        Mode::GameOver => {
            // Only the cosmetic hit flash keeps running
            decay_hit_timer(state, dt);
            return events;
        }
        Mode::Playing => {}
    }

    let step = frame_step(dt);
    // Everything this frame scrolls at the speed the frame started with
    let speed = state.game_speed;
    let tuning = &state.tuning;

    // Gravity and landing
    let player = &mut state.player;
    let standing_y = tuning.standing_y();
    player.vy += tuning.gravity * step;
    player.pos.y += player.vy * step;
    // Land only while falling or resting
    if player.pos.y >= standing_y && player.vy >= 0.0 {
        player.pos.y = standing_y;
        player.vy = 0.0;
        player.jump_charges = tuning.jump_charges;
    }

    // Run cycle only advances on the ground
    if player.on_ground(tuning) {
        player.frame_timer += step;
        if player.frame_timer > tuning.run_frame_period {
            player.frame = (player.frame + 1) % 2;
            player.frame_timer = 0.0;
        }
    }

    decay_hit_timer(state, dt);
    let tuning = &state.tuning;

    state.game_speed += tuning.speed_increment * step;

    // Spawning
    state.next_obstacle -= speed * step;
    if state.next_obstacle <= 0.0 {
        let kind = if rng.random::<f32>() > tuning.crawler_threshold {
            ObstacleKind::Crawler
        } else {
            ObstacleKind::SpikeRow
        };
        state.obstacles.push(Obstacle::new(kind, CANVAS_W, tuning));
        state.next_obstacle = tuning.spawn_gap_min
            + rng.random::<f32>() * (tuning.spawn_gap_max - tuning.spawn_gap_min);
        events.push(RunnerEvent::ObstacleSpawned(kind));
    }

    // Scroll and cleanup
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed * step;
    }
    let margin = tuning.cleanup_margin;
    state.obstacles.retain(|o| o.x > -margin);

    state.score += step;
    for layer in &mut state.layers {
        layer.offset = (layer.offset + speed * layer.speed * step).rem_euclid(tuning.parallax_wrap);
    }
    state.ground_offset =
        (state.ground_offset + speed * step).rem_euclid(tuning.ground_texture_period);
    state.frames += 1;

    // Collision ends the run
    if first_hit(&state.player, &state.obstacles, tuning).is_some() {
        state.mode = Mode::GameOver;
        state.player.hit_timer = tuning.hit_flash_secs;

        let score = state.display_score();
        let new_high_score = score > state.high_score;
        if new_high_score {
            state.high_score = score;
        }
        log::info!(
            "Game over: score {} after {} frames (speed {:.2}){}",
            score,
            state.frames,
            state.game_speed,
            if new_high_score { ", new high score" } else { "" }
        );
        events.push(RunnerEvent::GameOver {
            score,
            new_high_score,
        });
    }

    events
}

fn decay_hit_timer(state: &mut RunnerState, dt: f32) {
    let player = &mut state.player;
    if player.hit_timer > 0.0 {
        player.hit_timer = (player.hit_timer - dt.max(0.0)).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIRST_FRAME_DT;
    use crate::tuning::RunnerTuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = FIRST_FRAME_DT;

    fn new_state(tuning: RunnerTuning, high_score: u64) -> (RunnerState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(12345);
        let state = RunnerState::new(tuning, high_score, &mut rng);
        (state, rng)
    }

    fn press() -> TickInput {
        TickInput { press: true }
    }

    /// A run where the player hovers out of reach so nothing ever collides
    fn floating_run() -> (RunnerState, Pcg32) {
        let tuning = RunnerTuning {
            gravity: 0.0,
            ..Default::default()
        };
        let (mut state, rng) = new_state(tuning, 0);
        apply_action(&mut state, Action::Start);
        state.player.pos.y = 0.0;
        (state, rng)
    }

    #[test]
    fn test_idle_to_playing() {
        let (mut state, mut rng) = new_state(RunnerTuning::default(), 0);

        // No input: stays idle and nothing moves
        let events = tick(&mut state, &TickInput::default(), DT, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.mode, Mode::Idle);
        assert_eq!(state.score, 0.0);

        let events = tick(&mut state, &press(), DT, &mut rng);
        assert_eq!(events[0], RunnerEvent::RunStarted);
        assert_eq!(state.mode, Mode::Playing);
        assert!(state.score > 0.0);
    }

    #[test]
    fn test_jump_ignored_outside_playing() {
        let (mut state, _) = new_state(RunnerTuning::default(), 0);
        assert_eq!(apply_action(&mut state, Action::Jump), None);
        assert_eq!(state.player.vy, 0.0);
        assert_eq!(state.mode, Mode::Idle);

        state.mode = Mode::GameOver;
        assert_eq!(apply_action(&mut state, Action::Jump), None);
        assert_eq!(apply_action(&mut state, Action::Start), None);
        assert_eq!(state.mode, Mode::GameOver);
    }

    #[test]
    fn test_double_jump_budget() {
        let (mut state, mut rng) = new_state(RunnerTuning::default(), 0);
        apply_action(&mut state, Action::Start);
        assert_eq!(state.player.jump_charges, 2);

        assert_eq!(
            apply_action(&mut state, Action::Jump),
            Some(RunnerEvent::Jumped { charges_left: 1 })
        );
        tick(&mut state, &TickInput::default(), DT, &mut rng);
        assert!(!state.on_ground());

        assert_eq!(
            apply_action(&mut state, Action::Jump),
            Some(RunnerEvent::Jumped { charges_left: 0 })
        );
        tick(&mut state, &TickInput::default(), DT, &mut rng);

        let vy = state.player.vy;
        assert_eq!(apply_action(&mut state, Action::Jump), None);
        assert_eq!(state.player.vy, vy);
        assert_eq!(state.player.jump_charges, 0);

        // Fall back down; landing refills the budget
        state.obstacles.clear();
        for _ in 0..200 {
            state.obstacles.clear();
            tick(&mut state, &TickInput::default(), DT, &mut rng);
            if state.on_ground() {
                break;
            }
        }
        assert!(state.on_ground());
        assert_eq!(state.player.jump_charges, 2);
        assert_eq!(state.player.vy, 0.0);
    }

    #[test]
    fn test_zero_length_frame_keeps_jump_in_flight() {
        let (mut state, mut rng) = new_state(RunnerTuning::default(), 0);
        apply_action(&mut state, Action::Start);
        apply_action(&mut state, Action::Jump);
        let vy = state.player.vy;

        tick(&mut state, &TickInput::default(), 0.0, &mut rng);
        assert_eq!(state.player.jump_charges, 1);
        assert_eq!(state.player.vy, vy);

        apply_action(&mut state, Action::Jump);
        tick(&mut state, &TickInput::default(), 0.0, &mut rng);
        assert_eq!(state.player.jump_charges, 0);
        assert_eq!(apply_action(&mut state, Action::Jump), None);
    }

    #[test]
    fn test_player_never_sinks_below_ground() {
        let (mut state, mut rng) = new_state(RunnerTuning::default(), 0);
        apply_action(&mut state, Action::Start);
        apply_action(&mut state, Action::Jump);
        for _ in 0..120 {
            state.obstacles.clear();
            tick(&mut state, &TickInput::default(), 0.05, &mut rng);
            assert!(state.player.pos.y <= state.tuning().standing_y());
        }
    }

    #[test]
    fn test_run_frames_alternate_on_ground_only() {
        let (mut state, mut rng) = floating_run();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT, &mut rng);
        }
        assert_eq!(state.player.frame, 0);
        assert_eq!(state.player.frame_timer, 0.0);

        let (mut state, mut rng) = new_state(RunnerTuning::default(), 0);
        apply_action(&mut state, Action::Start);
        let mut swaps = 0;
        let mut last = state.player.frame;
        for _ in 0..40 {
            state.obstacles.clear();
            tick(&mut state, &TickInput::default(), DT, &mut rng);
            if state.player.frame != last {
                swaps += 1;
                last = state.player.frame;
            }
        }
        assert!(swaps >= 3, "swaps = {}", swaps);
    }

    #[test]
    fn test_first_spawn_and_gap_range() {
        let (mut state, mut rng) = floating_run();
        let mut spawned_at = Vec::new();
        let mut distance = 0.0;
        while spawned_at.len() < 20 {
            let speed = state.game_speed;
            let events = tick(&mut state, &TickInput::default(), DT, &mut rng);
            distance += speed * frame_step(DT);
            if events
                .iter()
                .any(|e| matches!(e, RunnerEvent::ObstacleSpawned(_)))
            {
                spawned_at.push(distance);
                assert!(state.next_obstacle >= 90.0 && state.next_obstacle <= 160.0);
            }
        }
        // The first obstacle waits for the initial 200 units
        assert!(spawned_at[0] >= 200.0 && spawned_at[0] < 210.0);
        for pair in spawned_at.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= 89.0 && gap <= 170.0, "gap {}", gap);
        }
    }

    #[test]
    fn test_spawn_weighting_favors_crawlers() {
        let (mut state, mut rng) = floating_run();
        let (mut crawlers, mut total) = (0u32, 0u32);
        while total < 2000 {
            for event in tick(&mut state, &TickInput::default(), 0.05, &mut rng) {
                if let RunnerEvent::ObstacleSpawned(kind) = event {
                    total += 1;
                    if kind == ObstacleKind::Crawler {
                        crawlers += 1;
                    }
                }
            }
        }
        let ratio = crawlers as f32 / total as f32;
        assert!((0.55..0.65).contains(&ratio), "crawler ratio {}", ratio);
    }

    #[test]
    fn test_obstacle_sizes_per_kind() {
        let tuning = RunnerTuning::default();
        let crawler = Obstacle::new(ObstacleKind::Crawler, 0.0, &tuning);
        let spikes = Obstacle::new(ObstacleKind::SpikeRow, 0.0, &tuning);
        assert_eq!((crawler.width, crawler.height), (20.0, 15.0));
        assert_eq!((spikes.width, spikes.height), (32.0, 14.0));
    }

    #[test]
    fn test_long_run_cleans_up_obstacles() {
        let (mut state, mut rng) = floating_run();
        let mut max_live = 0;
        for _ in 0..10_000 {
            tick(&mut state, &TickInput::default(), DT, &mut rng);
            assert_eq!(state.mode, Mode::Playing);
            for o in &state.obstacles {
                assert!(o.right() > -state.tuning().cleanup_margin);
            }
            max_live = max_live.max(state.obstacles.len());
        }
        // Screen width plus margin over the smallest gap bounds the live count
        assert!(max_live <= 12, "max live obstacles {}", max_live);
        for layer in &state.layers {
            assert!(layer.offset >= 0.0 && layer.offset < state.tuning().parallax_wrap);
        }
        assert!(state.ground_offset >= 0.0 && state.ground_offset < 20.0);
    }

    #[test]
    fn test_collision_freezes_run_and_records_high_score() {
        let (mut state, mut rng) = new_state(RunnerTuning::default(), 100);
        apply_action(&mut state, Action::Start);
        state.score = 137.25;
        let crawler = Obstacle::new(ObstacleKind::Crawler, 70.0, state.tuning());
        state.obstacles.push(crawler);

        let events = tick(&mut state, &TickInput::default(), 0.001, &mut rng);
        assert_eq!(
            events.last(),
            Some(&RunnerEvent::GameOver {
                score: 137,
                new_high_score: true
            })
        );
        assert_eq!(state.mode, Mode::GameOver);
        assert_eq!(state.high_score, 137);

        // Frozen: more frames change nothing but the hit flash
        let snapshot = (state.score, state.game_speed, state.obstacles.clone(), state.player.pos);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), DT, &mut rng);
        }
        assert_eq!(
            snapshot,
            (state.score, state.game_speed, state.obstacles.clone(), state.player.pos)
        );
        assert_eq!(state.player.hit_timer, 0.0);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let (mut state, mut rng) = new_state(RunnerTuning::default(), 200);
        apply_action(&mut state, Action::Start);
        state.score = 137.25;
        let crawler = Obstacle::new(ObstacleKind::Crawler, 70.0, state.tuning());
        state.obstacles.push(crawler);

        let events = tick(&mut state, &TickInput::default(), 0.001, &mut rng);
        assert_eq!(
            events.last(),
            Some(&RunnerEvent::GameOver {
                score: 137,
                new_high_score: false
            })
        );
        assert_eq!(state.high_score, 200);
    }

    #[test]
    fn test_restart_resets_run() {
        let (mut state, mut rng) = new_state(RunnerTuning::default(), 0);
        apply_action(&mut state, Action::Start);
        state.obstacles.push(Obstacle::new(ObstacleKind::SpikeRow, 64.0, state.tuning()));
        tick(&mut state, &TickInput::default(), DT, &mut rng);
        assert_eq!(state.mode, Mode::GameOver);

        let events = tick(&mut state, &press(), DT, &mut rng);
        assert_eq!(events[0], RunnerEvent::RunStarted);
        assert_eq!(state.mode, Mode::Playing);
        assert!(state.obstacles.is_empty());
        assert!(state.score <= 1.0 + 1e-4);
        assert_eq!(state.player.hit_timer, 0.0);
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let (mut a, mut rng_a) = floating_run();
        let (mut b, mut rng_b) = floating_run();
        tick(&mut a, &TickInput::default(), 10.0, &mut rng_a);
        tick(&mut b, &TickInput::default(), 0.05, &mut rng_b);
        assert_eq!(a.score, b.score);
        assert_eq!(a.game_speed, b.game_speed);
    }

    proptest! {
        #[test]
        fn prop_score_and_speed_never_decrease(
            seed in any::<u64>(),
            frames in proptest::collection::vec((0.0f32..0.2, any::<bool>()), 1..400),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = RunnerState::new(RunnerTuning::default(), 0, &mut rng);
            apply_action(&mut state, Action::Start);

            for (dt, pressed) in frames {
                let (score, speed, mode) = (state.score, state.game_speed, state.mode);
                tick(&mut state, &TickInput { press: pressed }, dt, &mut rng);

                prop_assert!(state.player.jump_charges <= 2);
                prop_assert!(state.player.pos.y <= state.tuning().standing_y());
                if mode == Mode::Playing && state.mode != Mode::Idle {
                    prop_assert!(state.score >= score);
                    prop_assert!(state.game_speed >= speed);
                }
                if mode == Mode::GameOver && state.mode == Mode::GameOver {
                    prop_assert_eq!(state.score, score);
                    prop_assert_eq!(state.game_speed, speed);
                }
            }
        }
    }
}
