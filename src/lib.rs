//! Lane Runner - a lane-based endless runner simulation
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (scenery streaming, difficulty, player, scoring)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Frame timestep used by the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Lane indices run from LANE_MIN (left) to LANE_MAX (right)
    pub const LANE_MIN: i32 = -1;
    pub const LANE_MAX: i32 = 1;

    /// Upper bound of the risk stat
    pub const MAX_RISK: f32 = 4.0;
    /// Risk and health snap to their bounds within this distance
    pub const STAT_EPSILON: f32 = 1e-4;

    /// Segments appended ahead of the pre-placed ones at startup
    pub const PREPOPULATE_SEGMENTS: usize = 7;
    /// A segment retires once its near edge is this many lengths behind the origin
    pub const RETIRE_LENGTHS: f32 = 2.0;

    /// Ground probe starts this far above the feet and reaches the same distance below
    pub const GROUND_PROBE_OFFSET: f32 = 0.15;

    /// Step-up probe is pushed this far into the obstacle
    pub const STEP_FORWARD_OFFSET: f32 = 0.15;
    /// Extra lift applied to the step-up probe origin
    pub const STEP_PROBE_LIFT: f32 = 0.05;
    /// Slack added to the step-up probe length
    pub const STEP_PROBE_MARGIN: f32 = 0.1;
    /// Height left between the feet and the ledge after stepping up
    pub const STEP_CLEARANCE: f32 = 0.01;

    /// Animator walk speed per unit of scroll speed
    pub const WALK_ANIM_SCALE: f32 = 0.2;

    /// Minimum dot product between swipe direction and an axis
    pub const SWIPE_DOT_THRESHOLD: f32 = 0.5;
}

/// Blend factor for frame-rate independent exponential smoothing.
///
/// `rate` is the convergence speed per second; the result is in [0, 1).
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

/// Angle between a surface normal and world up, in degrees
#[inline]
pub fn slope_angle_deg(normal: Vec3) -> f32 {
    Vec3::Y.angle_between(normal).to_degrees()
}
