//! End-to-end: puzzle → reveal → runner, then leave the page

use cabin_runner::gate::{
    PuzzleEvent, RevealEvent, RevealSequencer, Screen, ScreenFlow, UnlockPuzzle, Verdict,
    spiral_order,
};
use cabin_runner::persistence::MemoryStore;
use cabin_runner::sim::{Mode, RunnerEvent};
use cabin_runner::tuning::{PuzzleTuning, RevealTuning, RunnerTuning};
use cabin_runner::{HighScoreStore, Runner};
use rand::SeedableRng;
use rand_pcg::Pcg32;

const FRAME_MS: f64 = 1000.0 / 60.0;

#[test]
fn test_full_secret_page_flow() {
    let mut flow = ScreenFlow::new();
    let mut now = 0.0;
    assert_eq!(flow.screen(), Screen::Puzzle);

    // A wrong guess first; the selection survives the denial
    let mut puzzle = UnlockPuzzle::new(PuzzleTuning::default());
    for cell in [3, 6, 10] {
        puzzle.toggle(cell);
    }
    assert_eq!(puzzle.submit(now), Verdict::Denied);
    assert!(puzzle.is_denied());
    assert_eq!(puzzle.selected().len(), 3);

    puzzle.toggle(13);
    assert!(!puzzle.is_denied());
    assert_eq!(puzzle.submit(now), Verdict::Accepted);

    let mut unlocked_at = None;
    while now < 2000.0 {
        now += FRAME_MS;
        if puzzle.update(now).contains(&PuzzleEvent::Unlocked) {
            assert!(unlocked_at.is_none(), "success fired twice");
            unlocked_at = Some(now);
        }
    }
    let unlocked_at = unlocked_at.expect("puzzle never unlocked");
    assert!(unlocked_at >= 500.0);
    assert_eq!(flow.unlocked(), Some(Screen::Reveal));

    // Reveal starts when its screen mounts
    let mut reveal = RevealSequencer::new(RevealTuning::default());
    let start = now;
    reveal.activate(start);
    let mut flips = Vec::new();
    let mut completed = 0;
    while !reveal.is_start_enabled() {
        now += FRAME_MS;
        for event in reveal.update(now) {
            match event {
                RevealEvent::TileFlipped { index } => flips.push((index, now - start)),
                RevealEvent::Completed => completed += 1,
                RevealEvent::StartEnabled => {}
            }
        }
    }
    assert_eq!(completed, 1);
    assert_eq!(flips.len(), 16);
    for (k, (_, at)) in flips.iter().enumerate() {
        assert!(*at >= (k + 1) as f64 * 250.0, "flip {} at {}", k + 1, at);
    }
    let indices: Vec<usize> = flips.iter().map(|(index, _)| *index).collect();
    assert_eq!(indices, spiral_order(4, 4));
    assert!(reveal.start());
    assert!(!reveal.start(), "start only counts once");
    assert_eq!(flow.revealed(), Some(Screen::Game));

    // Runner
    let key = HighScoreStore::<MemoryStore>::STORAGE_KEY;
    let mut runner = Runner::new(
        RunnerTuning::default(),
        MemoryStore::with(key, "5"),
        Pcg32::seed_from_u64(2024),
    );
    assert_eq!(runner.mode(), Mode::Idle);
    assert_eq!(runner.state().high_score, 5);

    let events = runner.frame(1.0 / 60.0, true);
    assert!(events.contains(&RunnerEvent::RunStarted));

    // Never jump: the first obstacle ends the run
    let mut final_score = None;
    for _ in 0..10_000 {
        for event in runner.frame(1.0 / 60.0, false) {
            if let RunnerEvent::GameOver { score, .. } = event {
                final_score = Some(score);
            }
        }
        if final_score.is_some() {
            break;
        }
    }
    let score = final_score.expect("an idle runner always crashes");
    assert_eq!(runner.mode(), Mode::GameOver);
    assert_eq!(runner.high_scores().best(), score.max(5));
    if score > 5 {
        assert_eq!(runner.high_scores().store().raw(key), Some(score.to_string().as_str()));
    }

    // Leave: everything stops for good
    assert_eq!(flow.leave(), Some(Screen::Left));
    puzzle.teardown();
    reveal.teardown();
    runner.teardown();
    let frozen = runner.state().clone();
    for _ in 0..600 {
        now += FRAME_MS;
        assert!(puzzle.update(now).is_empty());
        assert!(reveal.update(now).is_empty());
        assert!(runner.frame(1.0 / 60.0, true).is_empty());
    }
    assert_eq!(runner.state().mode, frozen.mode);
    assert_eq!(runner.state().score, frozen.score);
    assert_eq!(flow.leave(), None);
}
