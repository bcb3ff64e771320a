//! Lane Runner headless driver
//!
//! Plays one run with a scripted swiper and logs what happens. The first
//! argument, if given, is a tuning JSON file. `LANE_RUNNER_SEED` picks the seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use lane_runner::consts::SIM_DT;
use lane_runner::sim::{
    DirectionalInput, FrameInput, GameEvent, RunOutcome, RunState, TrackPhysics, tick,
};
use lane_runner::Tuning;

/// Stop after ten simulated minutes
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Pickup radius used for trigger overlap
const TRIGGER_RADIUS: f32 = 0.6;

fn load_tuning() -> Option<Tuning> {
    match std::env::args().nth(1) {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => Some(tuning),
            Err(err) => {
                log::error!("Failed to load tuning from {}: {}", path, err);
                None
            }
        },
        None => Some(Tuning::default()),
    }
}

/// Random swipe roughly every second and a half
fn scripted_swipe(rng: &mut Pcg32) -> DirectionalInput {
    if rng.random::<f32>() > 1.0 / 90.0 {
        return DirectionalInput::NONE;
    }
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    DirectionalInput::from_swipe(Vec2::new(angle.cos(), angle.sin()))
}

fn main() {
    env_logger::init();

    let Some(tuning) = load_tuning() else {
        std::process::exit(1);
    };
    let seed: u64 = std::env::var("LANE_RUNNER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    log::info!("Lane Runner (headless) starting with seed {}", seed);

    let world = TrackPhysics::flat();
    let mut swiper = Pcg32::seed_from_u64(seed.wrapping_add(1));
    let mut state = RunState::new(tuning, seed);
    state.resume();

    while state.frame < MAX_FRAMES {
        let triggers = state
            .stream
            .overlapping_triggers(state.player.position, TRIGGER_RADIUS);
        let frame = FrameInput {
            dt: SIM_DT,
            input: scripted_swipe(&mut swiper),
            collisions: Vec::new(),
            triggers,
        };
        tick(&mut state, &frame, &world);

        let mut done = false;
        for event in state.drain_events() {
            match event {
                GameEvent::RiskChanged(risk) => log::debug!("risk -> {:.2}", risk),
                GameEvent::HealthChanged(health) => log::debug!("health -> {:.2}", health),
                GameEvent::ScoreChanged(_)
                | GameEvent::LaneChanged(_)
                | GameEvent::PlayerLanded => {}
                GameEvent::PlayerDied | GameEvent::FinishReached => {
                    log::info!("Run over at frame {}", state.frame);
                }
                GameEvent::ShowQuiz => {
                    state.answer_correct(1.0);
                    state.quiz_finished();
                }
                GameEvent::ShowFailureScreen => state.failure_acknowledged(),
                GameEvent::SceneRequested(scene) => {
                    log::info!("Host would now load scene {}", scene);
                    done = true;
                }
            }
        }
        if done {
            break;
        }
    }

    let hud = state.hud();
    let outcome = match state.outcome {
        Some(RunOutcome::Died) => "died",
        Some(RunOutcome::Finished) => "finished",
        None => "timed out",
    };
    log::info!(
        "Run {}: score {}, distance {:.1}, risk {:.2}, health {:.2}",
        outcome,
        hud.score_text,
        state.stream.distance_walked(),
        state.stats.risk(),
        state.stats.health()
    );
}
