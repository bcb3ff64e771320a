//! Player locomotion and collision
//!
//! The player never moves forward; the world scrolls past. Horizontal motion is
//! a lane index eased toward its center. Vertical motion is a simple body under
//! gravity with a ground probe, plus step-up over small ledges.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::input::DirectionalInput;
use super::physics::{Collision, PhysicsQuery};
use crate::consts::*;
use crate::slope_angle_deg;
use crate::smoothing_factor;
use crate::tuning::PlayerTuning;

/// Result of one player update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    /// Touched ground this frame after being airborne
    pub landed: bool,
    pub lane_changed: bool,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Vertical scale (0.5 while crouching)
    pub height_scale: f32,
    lane: i32,
    grounded: bool,
    /// Height of the ground under the probe, when grounded
    ground_height: Option<f32>,
    was_grounded: bool,
    forced_falling: bool,
    crouch_timer: f32,
    /// Frozen in place (dead or finished)
    kinematic: bool,
    dead: bool,
    won: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            height_scale: 1.0,
            lane: 0,
            grounded: false,
            ground_height: None,
            was_grounded: false,
            forced_falling: false,
            crouch_timer: 0.0,
            kinematic: false,
            dead: false,
            won: false,
        }
    }

    pub fn lane(&self) -> i32 {
        self.lane
    }

    /// Lane center on the X axis
    pub fn target_x(&self, stride: f32) -> f32 {
        self.lane as f32 * stride
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_forced_falling(&self) -> bool {
        self.forced_falling
    }

    pub fn is_crouching(&self) -> bool {
        self.crouch_timer > 0.0
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Animator walk speed for the current scroll speed
    pub fn walk_speed(scroll_speed: f32, paused: bool) -> f32 {
        if paused {
            0.0
        } else {
            scroll_speed * WALK_ANIM_SCALE
        }
    }

    /// Per-frame update (input, grounding, vertical moves, body integration)
    pub fn update<P: PhysicsQuery + ?Sized>(
        &mut self,
        input: &DirectionalInput,
        paused: bool,
        dt: f32,
        physics: &P,
        tuning: &PlayerTuning,
    ) -> PlayerStep {
        let landed = self.update_ground_status(physics);
        let lane_changed = self.handle_sideways_moves(input, paused, dt, tuning);

        if tuning.vertical_moves {
            self.handle_jumping(input, physics, tuning);
            self.handle_fast_falling(dt, physics, tuning);
            self.handle_fast_descent(input, tuning);
            self.handle_crouching(input, dt, tuning);
        }

        if !self.kinematic {
            self.integrate(dt, physics);
        }

        PlayerStep {
            landed,
            lane_changed,
        }
    }

    fn update_ground_status<P: PhysicsQuery + ?Sized>(&mut self, physics: &P) -> bool {
        let origin = self.position + Vec3::Y * GROUND_PROBE_OFFSET;
        self.ground_height = physics
            .raycast_down(origin, GROUND_PROBE_OFFSET * 2.0)
            .map(|hit| hit.y);
        self.grounded = self.ground_height.is_some();

        let landed = !self.was_grounded && self.grounded;
        if landed {
            self.forced_falling = false;
        }
        self.was_grounded = self.grounded;
        landed
    }

    fn handle_sideways_moves(
        &mut self,
        input: &DirectionalInput,
        paused: bool,
        dt: f32,
        tuning: &PlayerTuning,
    ) -> bool {
        let old_lane = self.lane;
        if !paused {
            if input.left {
                self.lane -= 1;
            } else if input.right {
                self.lane += 1;
            }
        }
        self.lane = self.lane.clamp(LANE_MIN, LANE_MAX);

        let target = self.target_x(tuning.lane_stride);
        self.position.x += (target - self.position.x) * smoothing_factor(tuning.lane_smoothing, dt);

        self.lane != old_lane
    }

    fn handle_jumping<P: PhysicsQuery + ?Sized>(
        &mut self,
        input: &DirectionalInput,
        physics: &P,
        tuning: &PlayerTuning,
    ) {
        if self.grounded && input.up {
            self.stand_up();
            let gravity = physics.gravity().length();
            self.velocity.y += (2.0 * tuning.jump_height * gravity).sqrt();
        }
    }

    fn handle_fast_falling<P: PhysicsQuery + ?Sized>(
        &mut self,
        dt: f32,
        physics: &P,
        tuning: &PlayerTuning,
    ) {
        if self.velocity.y < 0.0 {
            self.velocity += physics.gravity() * (tuning.fall_gravity_multiplier - 1.0) * dt;
        }
    }

    fn handle_fast_descent(&mut self, input: &DirectionalInput, tuning: &PlayerTuning) {
        if !self.forced_falling && !self.grounded && input.down {
            self.velocity = Vec3::NEG_Y * tuning.fast_descent_speed;
            self.forced_falling = true;
        }
    }

    fn handle_crouching(&mut self, input: &DirectionalInput, dt: f32, tuning: &PlayerTuning) {
        if input.down {
            self.crouch_timer = tuning.crouch_duration;
            self.height_scale = 0.5;
        }

        if self.crouch_timer > 0.0 {
            self.crouch_timer = (self.crouch_timer - dt).max(0.0);
            if self.crouch_timer == 0.0 {
                self.height_scale = 1.0;
            }
        }
    }

    fn stand_up(&mut self) {
        self.crouch_timer = 0.0;
        self.height_scale = 1.0;
    }

    /// Gravity and vertical motion with a swept landing probe
    fn integrate<P: PhysicsQuery + ?Sized>(&mut self, dt: f32, physics: &P) {
        let resting = self.grounded && self.velocity.y <= 0.0;
        if resting {
            self.velocity.y = 0.0;
            if let Some(height) = self.ground_height {
                self.position.y = height;
            }
            return;
        }

        self.velocity += physics.gravity() * dt;
        let old_y = self.position.y;
        let new_y = old_y + self.velocity.y * dt;

        if self.velocity.y <= 0.0 {
            let mut origin = self.position;
            origin.y = old_y + GROUND_PROBE_OFFSET;
            let reach = (old_y - new_y) + GROUND_PROBE_OFFSET * 2.0;
            if let Some(hit) = physics.raycast_down(origin, reach) {
                if new_y <= hit.y {
                    self.position.y = hit.y;
                    self.velocity.y = 0.0;
                    return;
                }
            }
        }
        self.position.y = new_y;
    }

    /// Step up over small ledges.
    ///
    /// Returns false when a steep contact has no ledge within step height; that
    /// contact is left to the host as a wall.
    pub fn resolve_collision<P: PhysicsQuery + ?Sized>(
        &mut self,
        collision: &Collision,
        physics: &P,
        tuning: &PlayerTuning,
    ) -> bool {
        for contact in &collision.contacts {
            if slope_angle_deg(contact.normal) <= tuning.max_slope_angle {
                // walkable
                continue;
            }

            let normal = contact.normal;
            let into_obstacle = Vec3::new(-normal.x, 0.0, -normal.z) * STEP_FORWARD_OFFSET;
            let origin = Vec3::new(
                contact.point.x,
                self.position.y + tuning.max_step_height,
                contact.point.z,
            ) + into_obstacle
                + Vec3::Y * STEP_PROBE_LIFT;

            let Some(hit) = physics.raycast_collider_down(
                collision.collider,
                origin,
                tuning.max_step_height + STEP_PROBE_MARGIN,
            ) else {
                return false;
            };

            self.position.y = hit.y + STEP_CLEARANCE;
        }
        true
    }

    /// Freeze and raise the death flag
    pub fn on_death(&mut self) {
        self.dead = true;
        self.kinematic = true;
        self.velocity = Vec3::ZERO;
    }

    /// Freeze and raise the win flag
    pub fn on_finish_line(&mut self) {
        self.won = true;
        self.kinematic = true;
        self.velocity = Vec3::ZERO;
    }
}
