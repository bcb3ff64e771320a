//! Data-driven game balance
//!
//! Everything a designer authors lives here: difficulty curves, spawn tables,
//! scenery prefabs, player feel and timings. Loaded from JSON; every field has
//! a default so partial files work.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::difficulty::DifficultyCurves;
use crate::sim::spawn::{SpawnEntry, SpawnableKind};
use crate::sim::stats::DeathRule;
use crate::sim::stream::{PlacedSegment, SegmentPrefab};

/// Errors raised while loading tuning data
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no scenery prefabs configured")]
    NoSceneryPrefabs,
    #[error("no spawnables configured")]
    NoSpawnables,
    #[error("spawnable {name:?} has negative weight {weight}")]
    NegativeWeight { name: String, weight: f32 },
    #[error("segment {name:?} has non-positive length {length}")]
    BadSegmentLength { name: String, length: f32 },
}

/// Player movement and collision feel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Distance between lane centers
    pub lane_stride: f32,
    /// Convergence rate toward the lane center (1/s)
    pub lane_smoothing: f32,
    /// Contacts steeper than this (degrees from up) are treated as obstacles
    pub max_slope_angle: f32,
    /// Tallest ledge the player steps onto automatically
    pub max_step_height: f32,
    /// Enables jump, crouch and fast descent on up/down input
    pub vertical_moves: bool,
    pub jump_height: f32,
    pub fast_descent_speed: f32,
    pub crouch_duration: f32,
    /// Extra gravity while falling (1 = none)
    pub fall_gravity_multiplier: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            lane_stride: 2.0,
            lane_smoothing: 7.5,
            max_slope_angle: 45.0,
            max_step_height: 0.5,
            vertical_moves: false,
            jump_height: 1.2,
            fast_descent_speed: 12.0,
            crouch_duration: 0.6,
            fall_gravity_multiplier: 2.0,
        }
    }
}

/// Scenery streaming setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamTuning {
    /// Segments already in the scene before the run starts
    pub initial_segments: Vec<PlacedSegment>,
    /// Prefabs picked uniformly for new segments
    pub scenery: Vec<SegmentPrefab>,
    pub finish_line: SegmentPrefab,
    /// Spawnables placed on spawn points, picked by weight
    pub spawnables: Vec<SpawnEntry>,
    /// Spawned distance after which the finish line is placed
    pub minimum_distance_to_walk: f32,
}

fn lane_points(stride: f32, rows: &[f32]) -> Vec<Vec3> {
    rows.iter()
        .flat_map(|&z| [-stride, 0.0, stride].map(|x| Vec3::new(x, 0.0, z)))
        .collect()
}

impl Default for StreamTuning {
    fn default() -> Self {
        let stride = PlayerTuning::default().lane_stride;
        Self {
            initial_segments: vec![PlacedSegment {
                prefab: SegmentPrefab::new("start", 20.0, Vec::new()),
                z: -10.0,
            }],
            scenery: vec![
                SegmentPrefab::new("street", 20.0, lane_points(stride, &[6.0, 14.0])),
                SegmentPrefab::new("park", 30.0, lane_points(stride, &[8.0, 22.0])),
                SegmentPrefab::new("plaza", 25.0, lane_points(stride, &[12.5])),
            ],
            finish_line: SegmentPrefab::new("finish_line", 10.0, Vec::new()),
            spawnables: vec![
                SpawnEntry::new("soda", SpawnableKind::Hazard { weight: 0.3 }, 3.0),
                SpawnEntry::new("fast_food", SpawnableKind::Hazard { weight: 0.5 }, 2.0),
                SpawnEntry::new("cigarette", SpawnableKind::Hazard { weight: 0.8 }, 1.0),
                SpawnEntry::new("fruit", SpawnableKind::Pickup { value: 0.4 }, 2.0),
                SpawnEntry::new("water", SpawnableKind::Pickup { value: 0.2 }, 2.0),
            ],
            minimum_distance_to_walk: 600.0,
        }
    }
}

/// Delays of the end-of-run sequences (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub failure_screen_delay: f32,
    pub quiz_delay: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            failure_screen_delay: 3.0,
            quiz_delay: 5.0,
        }
    }
}

/// Scenes requested when the run's end screens are dismissed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneTuning {
    pub after_quiz: String,
    pub after_failure: String,
}

impl Default for SceneTuning {
    fn default() -> Self {
        Self {
            after_quiz: "Level1".to_string(),
            after_failure: "Level1".to_string(),
        }
    }
}

/// Complete balance data for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: DifficultyCurves,
    /// Multiplier applied to every hazard weight
    pub risk_increase_factor: f32,
    pub death_rule: DeathRule,
    /// Bonus for a correct quiz answer, before the divisor
    pub correct_answer_bonus: f32,
    pub player: PlayerTuning,
    pub stream: StreamTuning,
    pub timing: TimingTuning,
    pub scenes: SceneTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            difficulty: DifficultyCurves::default(),
            risk_increase_factor: 1.0,
            death_rule: DeathRule::RiskMaximum,
            correct_answer_bonus: crate::sim::score::CORRECT_ANSWER_BONUS,
            player: PlayerTuning::default(),
            stream: StreamTuning::default(),
            timing: TimingTuning::default(),
            scenes: SceneTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and check tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning JSON from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Structural checks; curve shapes are the designer's business
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.stream.scenery.is_empty() {
            return Err(TuningError::NoSceneryPrefabs);
        }
        if self.stream.spawnables.is_empty() {
            return Err(TuningError::NoSpawnables);
        }
        if let Some(entry) = self.stream.spawnables.iter().find(|e| e.weight < 0.0) {
            return Err(TuningError::NegativeWeight {
                name: entry.name.clone(),
                weight: entry.weight,
            });
        }

        let prefabs = self
            .stream
            .scenery
            .iter()
            .chain(std::iter::once(&self.stream.finish_line))
            .chain(self.stream.initial_segments.iter().map(|p| &p.prefab));
        for prefab in prefabs {
            if prefab.length <= 0.0 {
                return Err(TuningError::BadSegmentLength {
                    name: prefab.name.clone(),
                    length: prefab.length,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(
            r#"{
                "risk_increase_factor": 1.5,
                "death_rule": "health_depleted",
                "player": { "lane_stride": 3.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(tuning.risk_increase_factor, 1.5);
        assert_eq!(tuning.death_rule, DeathRule::HealthDepleted);
        assert_eq!(tuning.player.lane_stride, 3.0);
        assert_eq!(tuning.player.lane_smoothing, 7.5);
        assert_eq!(tuning.stream.scenery.len(), 3);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut tuning = Tuning::default();
        tuning.stream.spawnables[1].weight = -1.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NegativeWeight { ref name, .. }) if name == "fast_food"
        ));
    }

    #[test]
    fn test_rejects_empty_tables() {
        let mut tuning = Tuning::default();
        tuning.stream.spawnables.clear();
        assert!(matches!(tuning.validate(), Err(TuningError::NoSpawnables)));

        tuning.stream.scenery.clear();
        assert!(matches!(tuning.validate(), Err(TuningError::NoSceneryPrefabs)));
    }

    #[test]
    fn test_rejects_zero_length_segment() {
        let mut tuning = Tuning::default();
        tuning.stream.finish_line.length = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::BadSegmentLength { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Tuning::load("/definitely/not/here.json"),
            Err(TuningError::Io(_))
        ));
    }
}
