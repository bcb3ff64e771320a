//! Weighted spawnable selection
//!
//! Cumulative weights are computed once; each draw is a linear scan for the
//! first non-zero bucket that covers the drawn value.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::stats::HitEffect;

/// What a spawnable does when the player runs into it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnableKind {
    /// Risk factor: raises risk by `weight` (scaled by the increase factor)
    Hazard { weight: f32 },
    /// Power-up: lowers risk by `value`
    Pickup { value: f32 },
}

impl SpawnableKind {
    pub fn hit_effect(&self) -> HitEffect {
        match *self {
            SpawnableKind::Hazard { weight } => HitEffect::RaiseRisk { weight },
            SpawnableKind::Pickup { value } => HitEffect::LowerRisk { value },
        }
    }
}

/// A spawnable prefab and its selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub name: String,
    pub kind: SpawnableKind,
    pub weight: f32,
}

impl SpawnEntry {
    pub fn new(name: impl Into<String>, kind: SpawnableKind, weight: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            weight,
        }
    }
}

/// Cumulative-weight sampler over a fixed, ordered weight set
#[derive(Debug, Clone, Default)]
pub struct WeightedSelector {
    weights: Vec<f32>,
    cumulative: Vec<f32>,
}

impl WeightedSelector {
    pub fn new(weights: impl IntoIterator<Item = f32>) -> Self {
        let weights: Vec<f32> = weights.into_iter().collect();
        let cumulative = weights
            .iter()
            .scan(0.0f32, |sum, &w| {
                *sum += w;
                Some(*sum)
            })
            .collect();
        Self {
            weights,
            cumulative,
        }
    }

    pub fn from_entries(entries: &[SpawnEntry]) -> Self {
        Self::new(entries.iter().map(|e| e.weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights
    pub fn total(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn cumulative(&self) -> &[f32] {
        &self.cumulative
    }

    /// Smallest index whose cumulative sum covers `u` and whose own weight is non-zero
    pub fn pick(&self, u: f32) -> Option<usize> {
        self.cumulative
            .iter()
            .zip(&self.weights)
            .position(|(&c, &w)| u <= c && w != 0.0)
    }

    /// Draw an index; falls back to a uniform index if the weighted scan finds nothing
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let u = rng.random::<f32>() * self.total();
        match self.pick(u) {
            Some(index) => Some(index),
            None => {
                log::warn!(
                    "Weighted pick found nothing for u={} (total={}), using uniform fallback",
                    u,
                    self.total()
                );
                Some(rng.random_range(0..self.len()))
            }
        }
    }
}
