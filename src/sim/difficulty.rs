//! Risk-driven difficulty
//!
//! Every gameplay rate hangs off the risk stat through an authored curve.

use serde::{Deserialize, Serialize};

use super::curve::Curve;
use crate::consts::MAX_RISK;

/// Difficulty values for one risk level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Scroll speed (units/s)
    pub speed: f32,
    /// Chance that a spawn point receives a spawnable
    pub spawn_chance: f32,
    /// Health lost per hit (or health missing, depending on the death rule)
    pub health_decrement: f32,
    /// Score per unit of distance walked
    pub score_rate: f32,
}

/// The four balance curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCurves {
    /// Risk [0, 4] -> scroll speed
    pub speed: Curve,
    /// Risk [0, 4] -> spawn chance
    pub spawn_chance: Curve,
    /// Normalized risk [0, 1] -> health decrement
    pub health_decrease: Curve,
    /// Risk [0, 4] -> score per unit walked
    pub score_rate: Curve,
}

impl Default for DifficultyCurves {
    fn default() -> Self {
        Self {
            speed: Curve::linear(0.0, 10.0, MAX_RISK, 6.0),
            spawn_chance: Curve::linear(0.0, 0.5, MAX_RISK, 0.25),
            health_decrease: Curve::linear(0.0, 0.0, 1.0, 1.0),
            score_rate: Curve::linear(0.0, 10.0, MAX_RISK, 2.0),
        }
    }
}

impl DifficultyCurves {
    /// Evaluate all curves for a (caller-clamped) risk value
    pub fn evaluate(&self, risk: f32) -> Difficulty {
        Difficulty {
            speed: self.speed.evaluate(risk),
            spawn_chance: self.spawn_chance.evaluate(risk),
            health_decrement: self.health_decrement(risk),
            score_rate: self.score_rate(risk),
        }
    }

    /// Health curve sampled at risk / MAX_RISK
    pub fn health_decrement(&self, risk: f32) -> f32 {
        self.health_decrease.evaluate((risk / MAX_RISK).clamp(0.0, 1.0))
    }

    pub fn score_rate(&self, risk: f32) -> f32 {
        self.score_rate.evaluate(risk)
    }
}
