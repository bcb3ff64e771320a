//! Scenery streaming
//!
//! The track is a queue of segments scrolling toward -Z. The oldest segment is
//! retired once it is two of its own lengths behind the origin and a new one is
//! appended after the tail, so the track ahead never runs out until the finish
//! line closes the stream.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::TriggerHit;
use super::spawn::{SpawnEntry, SpawnableKind, WeightedSelector};
use crate::consts::RETIRE_LENGTHS;
use crate::tuning::StreamTuning;

/// Authored segment template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPrefab {
    pub name: String,
    /// Extent along the scroll axis
    pub length: f32,
    /// Spawn points relative to the segment's near edge
    #[serde(default)]
    pub spawn_points: Vec<Vec3>,
}

impl SegmentPrefab {
    pub fn new(name: impl Into<String>, length: f32, spawn_points: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            length,
            spawn_points,
        }
    }
}

/// A segment already in the scene when the run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSegment {
    pub prefab: SegmentPrefab,
    /// Near edge position along the scroll axis
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnableId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Pre-placed before the run
    Initial,
    /// Random scenery
    Scenery,
    FinishLine,
}

/// Segment lifecycle; removal from the stream is the final state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentPhase {
    Active,
    /// Far enough behind the player to be destroyed
    Retiring,
}

/// A spawnable sitting on a segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawnable {
    pub id: SpawnableId,
    pub name: String,
    pub kind: SpawnableKind,
    /// Position relative to the segment's near edge
    pub offset: Vec3,
}

/// A live segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub kind: SegmentKind,
    pub prefab: String,
    pub length: f32,
    /// Near edge position along the scroll axis
    pub z: f32,
    pub phase: SegmentPhase,
    pub spawnables: Vec<Spawnable>,
}

impl Segment {
    /// Far edge position
    pub fn end(&self) -> f32 {
        self.z + self.length
    }

    pub fn origin(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.z)
    }

    fn should_retire(&self) -> bool {
        self.z < -RETIRE_LENGTHS * self.length
    }
}

/// What happened during one stream advance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamStep {
    pub retired: Option<SegmentId>,
    pub spawned: Option<SegmentId>,
    /// The segment spawned this step is the finish line
    pub finish_line_spawned: bool,
}

/// Sliding window of world segments
#[derive(Debug, Clone)]
pub struct SceneryStream {
    segments: VecDeque<Segment>,
    scenery: Vec<SegmentPrefab>,
    finish_line: SegmentPrefab,
    spawn_table: Vec<SpawnEntry>,
    selector: WeightedSelector,
    minimum_distance: f32,
    distance_walked: f32,
    distance_spawned: f32,
    finish_line_spawned: bool,
    /// Spawn points of the pre-placed segments, filled by `start`
    initial_points: Vec<Vec<Vec3>>,
    next_segment_id: u32,
    next_spawnable_id: u32,
}

impl SceneryStream {
    /// Build the stream and adopt the pre-placed segments (no spawnables yet)
    pub fn new(config: &StreamTuning) -> Self {
        let mut stream = Self {
            segments: VecDeque::new(),
            scenery: config.scenery.clone(),
            finish_line: config.finish_line.clone(),
            spawn_table: config.spawnables.clone(),
            selector: WeightedSelector::from_entries(&config.spawnables),
            minimum_distance: config.minimum_distance_to_walk,
            distance_walked: 0.0,
            distance_spawned: 0.0,
            finish_line_spawned: false,
            initial_points: Vec::new(),
            next_segment_id: 1,
            next_spawnable_id: 1,
        };

        for placed in &config.initial_segments {
            let id = stream.next_segment_id();
            stream.segments.push_back(Segment {
                id,
                kind: SegmentKind::Initial,
                prefab: placed.prefab.name.clone(),
                length: placed.prefab.length,
                z: placed.z,
                phase: SegmentPhase::Active,
                spawnables: Vec::new(),
            });
            stream.initial_points.push(placed.prefab.spawn_points.clone());
        }

        stream
    }

    /// Fill the pre-placed segments, append `count` segments ahead of them and
    /// reset the spawned distance to the track in front of the first segment
    pub fn start<R: Rng + ?Sized>(&mut self, count: usize, spawn_chance: f32, rng: &mut R) {
        let initial_points = std::mem::take(&mut self.initial_points);
        for (index, points) in initial_points.iter().enumerate() {
            let spawnables = self.place_spawnables(points, spawn_chance, rng);
            if let Some(segment) = self.segments.get_mut(index) {
                segment.spawnables = spawnables;
            }
        }

        for _ in 0..count {
            self.spawn_at_end(spawn_chance, rng);
        }

        // The first segment sits behind the player
        self.distance_spawned = self.segments.iter().skip(1).map(|s| s.length).sum();
    }

    fn next_segment_id(&mut self) -> SegmentId {
        let id = SegmentId(self.next_segment_id);
        self.next_segment_id += 1;
        id
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn front(&self) -> Option<&Segment> {
        self.segments.front()
    }

    pub fn back(&self) -> Option<&Segment> {
        self.segments.back()
    }

    pub fn distance_walked(&self) -> f32 {
        self.distance_walked
    }

    pub fn distance_spawned(&self) -> f32 {
        self.distance_spawned
    }

    pub fn finish_line_spawned(&self) -> bool {
        self.finish_line_spawned
    }

    /// Near edge of the finish line, if it is on the track
    pub fn finish_line_z(&self) -> Option<f32> {
        self.segments
            .iter()
            .find(|s| s.kind == SegmentKind::FinishLine)
            .map(|s| s.z)
    }

    /// Scroll the track, retire the front segment if due and replace it.
    ///
    /// Distance walked only grows when `accrue_distance` is set.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        speed: f32,
        dt: f32,
        accrue_distance: bool,
        spawn_chance: f32,
        rng: &mut R,
    ) -> StreamStep {
        let delta = (speed * dt).max(0.0);

        for segment in &mut self.segments {
            segment.z -= delta;
            if segment.phase == SegmentPhase::Active && segment.should_retire() {
                segment.phase = SegmentPhase::Retiring;
            }
        }

        if accrue_distance {
            self.distance_walked += delta;
        }

        let mut step = StreamStep::default();
        if self
            .segments
            .front()
            .is_some_and(|s| s.phase == SegmentPhase::Retiring)
        {
            step.retired = self.segments.pop_front().map(|s| s.id);
            step.spawned = self.spawn_at_end(spawn_chance, rng);
            step.finish_line_spawned = step.spawned.is_some() && self.finish_line_spawned;
        }
        step
    }

    /// Append one segment after the tail; nothing once the finish line is out
    fn spawn_at_end<R: Rng + ?Sized>(
        &mut self,
        spawn_chance: f32,
        rng: &mut R,
    ) -> Option<SegmentId> {
        if self.finish_line_spawned {
            return None;
        }

        let z = self.segments.back().map_or(0.0, Segment::end);

        let (kind, prefab) = if self.distance_spawned > self.minimum_distance {
            self.finish_line_spawned = true;
            log::info!(
                "Finish line spawned at z={:.1} after {:.1} units of track",
                z,
                self.distance_spawned
            );
            (SegmentKind::FinishLine, self.finish_line.clone())
        } else {
            if self.scenery.is_empty() {
                return None;
            }
            let index = rng.random_range(0..self.scenery.len());
            (SegmentKind::Scenery, self.scenery[index].clone())
        };

        let spawnables = match kind {
            SegmentKind::FinishLine => Vec::new(),
            _ => self.place_spawnables(&prefab.spawn_points, spawn_chance, rng),
        };

        let id = self.next_segment_id();
        self.distance_spawned += prefab.length;
        self.segments.push_back(Segment {
            id,
            kind,
            prefab: prefab.name,
            length: prefab.length,
            z,
            phase: SegmentPhase::Active,
            spawnables,
        });
        Some(id)
    }

    /// Roll each spawn point against `spawn_chance` and fill it by weight
    fn place_spawnables<R: Rng + ?Sized>(
        &mut self,
        points: &[Vec3],
        spawn_chance: f32,
        rng: &mut R,
    ) -> Vec<Spawnable> {
        let mut placed = Vec::new();
        for &offset in points {
            if rng.random::<f32>() >= spawn_chance {
                continue;
            }
            let Some(index) = self.selector.sample(rng) else {
                continue;
            };
            let entry = &self.spawn_table[index];
            let id = SpawnableId(self.next_spawnable_id);
            self.next_spawnable_id += 1;
            placed.push(Spawnable {
                id,
                name: entry.name.clone(),
                kind: entry.kind,
                offset,
            });
        }
        placed
    }

    /// World position of a spawnable
    pub fn spawnable_position(&self, id: SpawnableId) -> Option<Vec3> {
        self.segments.iter().find_map(|segment| {
            segment
                .spawnables
                .iter()
                .find(|s| s.id == id)
                .map(|s| segment.origin() + s.offset)
        })
    }

    /// Remove a spawnable the player ran into
    pub fn take_spawnable(&mut self, id: SpawnableId) -> Option<Spawnable> {
        self.segments.iter_mut().find_map(|segment| {
            let index = segment.spawnables.iter().position(|s| s.id == id)?;
            Some(segment.spawnables.remove(index))
        })
    }

    /// Trigger volumes overlapping a player at `position`.
    ///
    /// Spawnables count when within `radius` on the ground plane; the finish
    /// line counts once its near edge reaches the player.
    pub fn overlapping_triggers(&self, position: Vec3, radius: f32) -> Vec<TriggerHit> {
        let mut hits = Vec::new();
        for segment in &self.segments {
            for spawnable in &segment.spawnables {
                let at = segment.origin() + spawnable.offset;
                let dx = at.x - position.x;
                let dz = at.z - position.z;
                if dx * dx + dz * dz <= radius * radius {
                    hits.push(TriggerHit::Spawnable(spawnable.id));
                }
            }
            if segment.kind == SegmentKind::FinishLine && segment.z <= position.z {
                hits.push(TriggerHit::FinishLine);
            }
        }
        hits
    }
}
