//! Physics-facing types
//!
//! The host owns the physics world. Each frame it hands the tick the contacts
//! and trigger entries it detected, plus a `PhysicsQuery` for downward probes.
//! `TrackPhysics` is a minimal box world for hosts (and tests) without an engine.

use glam::Vec3;

use super::stream::SpawnableId;

/// Handle of a collider in the host physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u32);

/// One contact of a collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub point: Vec3,
    /// Surface normal, pointing away from the other collider
    pub normal: Vec3,
}

/// A collision between the player and one collider
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub collider: ColliderId,
    pub contacts: Vec<ContactPoint>,
}

/// Trigger volume the player entered this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerHit {
    Spawnable(SpawnableId),
    FinishLine,
}

/// Downward ray queries against the host world
pub trait PhysicsQuery {
    /// Cast straight down from `origin` against solid geometry (triggers ignored).
    /// Returns the hit point.
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Cast straight down from `origin` against a single collider
    fn raycast_collider_down(
        &self,
        collider: ColliderId,
        origin: Vec3,
        max_distance: f32,
    ) -> Option<Vec3>;

    fn gravity(&self) -> Vec3 {
        Vec3::new(0.0, -9.81, 0.0)
    }
}

/// Axis-aligned solid box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub id: ColliderId,
    pub min: Vec3,
    pub max: Vec3,
}

impl BoxCollider {
    fn covers(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    fn probe(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        let top = self.max.y;
        let drop = origin.y - top;
        if self.covers(origin.x, origin.z) && (0.0..=max_distance).contains(&drop) {
            Some(Vec3::new(origin.x, top, origin.z))
        } else {
            None
        }
    }
}

/// Infinite flat ground plus static boxes
#[derive(Debug, Clone, Default)]
pub struct TrackPhysics {
    pub ground_height: f32,
    pub boxes: Vec<BoxCollider>,
}

impl TrackPhysics {
    /// Collider id reserved for the ground plane
    pub const GROUND: ColliderId = ColliderId(0);

    pub fn flat() -> Self {
        Self::default()
    }

    pub fn with_box(mut self, id: u32, min: Vec3, max: Vec3) -> Self {
        self.boxes.push(BoxCollider {
            id: ColliderId(id),
            min,
            max,
        });
        self
    }

    fn probe_ground(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        let drop = origin.y - self.ground_height;
        (0.0..=max_distance)
            .contains(&drop)
            .then(|| Vec3::new(origin.x, self.ground_height, origin.z))
    }
}

impl PhysicsQuery for TrackPhysics {
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        // Nearest hit is the highest surface below the origin
        self.boxes
            .iter()
            .filter_map(|b| b.probe(origin, max_distance))
            .chain(self.probe_ground(origin, max_distance))
            .max_by(|a, b| a.y.total_cmp(&b.y))
    }

    fn raycast_collider_down(
        &self,
        collider: ColliderId,
        origin: Vec3,
        max_distance: f32,
    ) -> Option<Vec3> {
        if collider == Self::GROUND {
            return self.probe_ground(origin, max_distance);
        }
        // A collider may be made of several boxes
        self.boxes
            .iter()
            .filter(|b| b.id == collider)
            .filter_map(|b| b.probe(origin, max_distance))
            .max_by(|a, b| a.y.total_cmp(&b.y))
    }
}
