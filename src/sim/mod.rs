//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Explicit inputs only (frame time, directional input, physics contacts)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod curve;
pub mod difficulty;
pub mod input;
pub mod physics;
pub mod player;
pub mod score;
pub mod spawn;
pub mod state;
pub mod stats;
pub mod stream;
pub mod tick;
pub mod timer;

pub use curve::{Curve, Keyframe};
pub use difficulty::{Difficulty, DifficultyCurves};
pub use input::DirectionalInput;
pub use physics::{
    BoxCollider, ColliderId, Collision, ContactPoint, PhysicsQuery, TrackPhysics, TriggerHit,
};
pub use player::{Player, PlayerStep};
pub use score::Score;
pub use spawn::{SpawnEntry, SpawnableKind, WeightedSelector};
pub use state::{GameEvent, HudSnapshot, RunOutcome, RunState};
pub use stats::{DeathRule, HitEffect, PlayerStats, StatChange};
pub use stream::{
    PlacedSegment, SceneryStream, Segment, SegmentId, SegmentKind, SegmentPhase, SegmentPrefab,
    Spawnable, SpawnableId, StreamStep,
};
pub use tick::{FrameInput, tick};
pub use timer::{TimedEvent, TimerQueue};
