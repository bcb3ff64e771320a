//! Per-frame update
//!
//! Phases run in a fixed order so bookkeeping sees every object's update:
//! 1. physics: collisions (step-up), then trigger entries
//! 2. update: player movement
//! 3. late update: scenery scroll and replacement, distance score, difficulty
//! 4. timers

use super::input::DirectionalInput;
use super::physics::{Collision, PhysicsQuery, TriggerHit};
use super::state::{GameEvent, RunState};

/// Everything the host feeds into one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Elapsed time since the previous frame (seconds)
    pub dt: f32,
    /// Merged keyboard/swipe input for this frame only
    pub input: DirectionalInput,
    /// Collisions reported by the physics step
    pub collisions: Vec<Collision>,
    /// Trigger volumes entered this frame
    pub triggers: Vec<TriggerHit>,
}

impl FrameInput {
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Default::default()
        }
    }

    pub fn with_input(dt: f32, input: DirectionalInput) -> Self {
        Self {
            dt,
            input,
            ..Default::default()
        }
    }
}

/// Advance the run by one frame
pub fn tick<P: PhysicsQuery + ?Sized>(state: &mut RunState, frame: &FrameInput, physics: &P) {
    let dt = frame.dt.max(0.0);
    state.frame += 1;

    physics_phase(state, frame, physics);
    update_phase(state, frame, physics, dt);
    late_update_phase(state, dt);

    for event in state.timers.advance(dt) {
        state.fire(event);
    }
}

fn physics_phase<P: PhysicsQuery + ?Sized>(state: &mut RunState, frame: &FrameInput, physics: &P) {
    if !state.player.is_kinematic() {
        for collision in &frame.collisions {
            let handled = state
                .player
                .resolve_collision(collision, physics, &state.tuning.player);
            if !handled {
                log::trace!("Unresolved wall contact with {:?}", collision.collider);
            }
        }
    }

    if state.is_game_over() {
        return;
    }

    for trigger in &frame.triggers {
        match *trigger {
            TriggerHit::Spawnable(id) => {
                if let Some(spawnable) = state.stream.take_spawnable(id) {
                    log::debug!("Player hit {} ({:?})", spawnable.name, spawnable.kind);
                    state.apply_hit(spawnable.kind.hit_effect());
                }
            }
            TriggerHit::FinishLine => state.on_reached_finish_line(),
        }
        if state.is_game_over() {
            break;
        }
    }
}

fn update_phase<P: PhysicsQuery + ?Sized>(
    state: &mut RunState,
    frame: &FrameInput,
    physics: &P,
    dt: f32,
) {
    if state.is_game_over() {
        return;
    }

    let paused = state.is_paused();
    let step = state
        .player
        .update(&frame.input, paused, dt, physics, &state.tuning.player);

    if step.lane_changed {
        let lane = state.player.lane();
        state.push_event(GameEvent::LaneChanged(lane));
    }
    if step.landed {
        state.push_event(GameEvent::PlayerLanded);
    }
}

fn late_update_phase(state: &mut RunState, dt: f32) {
    if state.is_paused() {
        return;
    }

    let accrue = !state.is_game_over();
    state
        .stream
        .advance(state.speed, dt, accrue, state.spawn_chance, &mut state.rng);

    state.award_distance_score();
    state.update_difficulty();
}
