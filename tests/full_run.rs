//! Whole-run scenarios driven through the public tick loop

use lane_runner::Tuning;
use lane_runner::consts::SIM_DT;
use lane_runner::sim::{
    Curve, DirectionalInput, FrameInput, GameEvent, RunOutcome, RunState, SpawnEntry,
    SpawnableKind, TrackPhysics, tick,
};

const TRIGGER_RADIUS: f32 = 0.6;
const MAX_FRAMES: u64 = 60 * 120;

/// Tick with overlap-derived triggers until the run ends, collecting events
fn play_until_over(state: &mut RunState, world: &TrackPhysics) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while !state.is_game_over() && state.frame < MAX_FRAMES {
        let frame = FrameInput {
            dt: SIM_DT,
            input: DirectionalInput::NONE,
            collisions: Vec::new(),
            triggers: state
                .stream
                .overlapping_triggers(state.player.position, TRIGGER_RADIUS),
        };
        tick(state, &frame, world);
        events.extend(state.drain_events());
    }
    events
}

fn idle_for(state: &mut RunState, world: &TrackPhysics, seconds: f32) -> Vec<GameEvent> {
    let frames = (seconds / SIM_DT).ceil() as u32;
    let mut events = Vec::new();
    for _ in 0..frames {
        tick(state, &FrameInput::idle(SIM_DT), world);
        events.extend(state.drain_events());
    }
    events
}

fn count(events: &[GameEvent], wanted: &GameEvent) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

#[test]
fn test_run_reaches_finish_line_and_quiz() {
    let mut tuning = Tuning::default();
    tuning.difficulty.spawn_chance = Curve::constant(0.0);
    tuning.stream.minimum_distance_to_walk = 100.0;

    let world = TrackPhysics::flat();
    let mut state = RunState::new(tuning, 7);
    state.resume();

    let events = play_until_over(&mut state, &world);
    assert_eq!(state.outcome, Some(RunOutcome::Finished));
    assert_eq!(count(&events, &GameEvent::FinishReached), 1);
    assert!(state.player.has_won());
    assert!(state.stream.finish_line_spawned());

    let walked = state.stream.distance_walked();
    assert!(walked > 100.0);
    // One point per unit at risk zero
    assert!(state.score.value() >= 10.0 * (walked.floor() - 1.0));

    // Frozen while the quiz timer runs
    let events = idle_for(&mut state, &world, 4.5);
    assert!(!state.quiz_visible);
    assert_eq!(count(&events, &GameEvent::ShowQuiz), 0);
    assert_eq!(state.stream.distance_walked(), walked);

    let events = idle_for(&mut state, &world, 1.0);
    assert!(state.quiz_visible);
    assert_eq!(count(&events, &GameEvent::ShowQuiz), 1);

    let before = state.score.value();
    state.answer_correct(2.0);
    assert_eq!(state.score.value(), before + 125.0);

    state.quiz_finished();
    assert!(
        state
            .drain_events()
            .contains(&GameEvent::SceneRequested("Level1".to_string()))
    );
}

#[test]
fn test_run_dies_from_hazards_and_shows_failure() {
    let mut tuning = Tuning::default();
    tuning.difficulty.spawn_chance = Curve::constant(1.0);
    tuning.stream.spawnables = vec![SpawnEntry::new(
        "cigarette",
        SpawnableKind::Hazard { weight: 1.0 },
        1.0,
    )];

    let world = TrackPhysics::flat();
    let mut state = RunState::new(tuning, 8);
    state.resume();

    let events = play_until_over(&mut state, &world);
    assert_eq!(state.outcome, Some(RunOutcome::Died));
    assert_eq!(count(&events, &GameEvent::PlayerDied), 1);
    assert_eq!(state.stats.risk(), 4.0);
    assert_eq!(state.speed, 0.0);
    assert!(state.hud().is_dead);
    assert!(!state.stream.finish_line_spawned());

    let score = state.score.value();
    let events = idle_for(&mut state, &world, 2.5);
    assert!(!state.failure_screen_visible);
    assert_eq!(count(&events, &GameEvent::ShowFailureScreen), 0);

    let events = idle_for(&mut state, &world, 1.0);
    assert!(state.failure_screen_visible);
    assert_eq!(count(&events, &GameEvent::ShowFailureScreen), 1);
    assert_eq!(state.score.value(), score);

    state.failure_acknowledged();
    assert_eq!(
        state.drain_events(),
        vec![GameEvent::SceneRequested("Level1".to_string())]
    );
}

#[test]
fn test_same_seed_same_run() {
    let world = TrackPhysics::flat();
    let mut a = RunState::new(Tuning::default(), 99);
    let mut b = RunState::new(Tuning::default(), 99);
    a.resume();
    b.resume();

    let events_a = play_until_over(&mut a, &world);
    let events_b = play_until_over(&mut b, &world);
    assert_eq!(events_a, events_b);
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.score.value(), b.score.value());
    assert_eq!(a.stream.distance_walked(), b.stream.distance_walked());
}
