//! Risk and health accumulation
//!
//! Risk is the single stat the run revolves around. Health is never touched
//! directly; it always comes out of the health curve sampled at risk.

use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyCurves;
use crate::consts::{MAX_RISK, STAT_EPSILON};

/// Which accumulator rule drives health and death
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathRule {
    /// health = 1 - curve(risk / 4); the run ends when risk reaches its maximum
    #[default]
    RiskMaximum,
    /// each hazard hit subtracts curve(risk / 4) from health; the run ends at zero health
    HealthDepleted,
}

/// Effect of touching a spawnable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitEffect {
    RaiseRisk { weight: f32 },
    LowerRisk { value: f32 },
}

/// What changed after applying a hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatChange {
    pub risk_changed: bool,
    pub health_changed: bool,
    /// Set only on the hit that kills the player
    pub died: bool,
}

/// Risk/health meter for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    risk: f32,
    health: f32,
    dead: bool,
    increase_factor: f32,
    rule: DeathRule,
}

impl PlayerStats {
    pub fn new(increase_factor: f32, rule: DeathRule) -> Self {
        Self {
            risk: 0.0,
            health: 1.0,
            dead: false,
            increase_factor,
            rule,
        }
    }

    /// Start from a given risk level (health follows the rule)
    pub fn with_risk(mut self, risk: f32, curves: &DifficultyCurves) -> Self {
        self.risk = risk.clamp(0.0, MAX_RISK);
        if self.rule == DeathRule::RiskMaximum {
            self.health = (1.0 - curves.health_decrement(self.risk)).clamp(0.0, 1.0);
        }
        self
    }

    pub fn risk(&self) -> f32 {
        self.risk
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    /// Risk as a fraction of its maximum, for the risk bar
    pub fn risk_fraction(&self) -> f32 {
        (self.risk / MAX_RISK).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn rule(&self) -> DeathRule {
        self.rule
    }

    /// Apply a hit and report what changed
    pub fn apply(&mut self, effect: HitEffect, curves: &DifficultyCurves) -> StatChange {
        let old_risk = self.risk;
        let old_health = self.health;

        match effect {
            HitEffect::RaiseRisk { weight } => {
                self.risk += self.increase_factor * weight;
            }
            HitEffect::LowerRisk { value } => {
                self.risk -= value;
            }
        }
        self.risk = snap_to_bounds(self.risk, MAX_RISK);

        match self.rule {
            DeathRule::RiskMaximum => {
                self.health = 1.0 - curves.health_decrement(self.risk);
            }
            DeathRule::HealthDepleted => {
                if matches!(effect, HitEffect::RaiseRisk { .. }) {
                    self.health -= curves.health_decrement(self.risk);
                }
            }
        }
        self.health = snap_to_bounds(self.health, 1.0);

        let should_die = match self.rule {
            DeathRule::RiskMaximum => self.risk >= MAX_RISK,
            DeathRule::HealthDepleted => self.health <= 0.0,
        };
        let died = should_die && !self.dead;
        if died {
            self.dead = true;
        }

        StatChange {
            risk_changed: self.risk != old_risk,
            health_changed: self.health != old_health,
            died,
        }
    }
}

/// Clamp to [0, max], absorbing f32 drift from repeated small hits
fn snap_to_bounds(value: f32, max: f32) -> f32 {
    if value >= max - STAT_EPSILON {
        max
    } else if value <= STAT_EPSILON {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::curve::Curve;
    use proptest::prelude::*;

    fn curves() -> DifficultyCurves {
        DifficultyCurves::default()
    }

    #[test]
    fn test_hazard_to_maximum_kills_once() {
        let curves = curves();
        let mut stats = PlayerStats::new(1.0, DeathRule::RiskMaximum).with_risk(3.9, &curves);

        let change = stats.apply(HitEffect::RaiseRisk { weight: 0.2 }, &curves);
        assert_eq!(stats.risk(), 4.0);
        assert!(change.died);
        assert!(stats.is_dead());
        assert_eq!(stats.health(), 0.0);

        let again = stats.apply(HitEffect::RaiseRisk { weight: 0.2 }, &curves);
        assert!(!again.died);
        assert!(!again.risk_changed);
    }

    #[test]
    fn test_small_hazards_reach_maximum() {
        let curves = curves();
        let mut stats = PlayerStats::new(1.0, DeathRule::RiskMaximum);
        let mut deaths = 0;
        for _ in 0..40 {
            if stats.apply(HitEffect::RaiseRisk { weight: 0.1 }, &curves).died {
                deaths += 1;
            }
        }
        assert_eq!(deaths, 1);
        assert_eq!(stats.risk(), MAX_RISK);
        assert_eq!(stats.health(), 0.0);
        assert!(stats.is_dead());
    }

    #[test]
    fn test_pickup_lowers_risk_and_restores_health() {
        let curves = curves();
        let mut stats = PlayerStats::new(1.0, DeathRule::RiskMaximum).with_risk(2.0, &curves);
        assert!((stats.health() - 0.5).abs() < 1e-6);

        let change = stats.apply(HitEffect::LowerRisk { value: 1.0 }, &curves);
        assert!(change.risk_changed && change.health_changed);
        assert!((stats.risk() - 1.0).abs() < 1e-6);
        assert!((stats.health() - 0.75).abs() < 1e-6);

        stats.apply(HitEffect::LowerRisk { value: 5.0 }, &curves);
        assert_eq!(stats.risk(), 0.0);
        assert_eq!(stats.health(), 1.0);
    }

    #[test]
    fn test_increase_factor_scales_hazards() {
        let curves = curves();
        let mut stats = PlayerStats::new(2.5, DeathRule::RiskMaximum);
        stats.apply(HitEffect::RaiseRisk { weight: 0.4 }, &curves);
        assert!((stats.risk() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_health_depleted_rule_subtracts_per_hit() {
        let curves = DifficultyCurves {
            health_decrease: Curve::constant(0.3),
            ..Default::default()
        };
        let mut stats = PlayerStats::new(0.1, DeathRule::HealthDepleted);

        for _ in 0..3 {
            let change = stats.apply(HitEffect::RaiseRisk { weight: 1.0 }, &curves);
            assert!(!change.died);
        }
        assert!((stats.health() - 0.1).abs() < 1e-5);

        // Pickups never heal under this rule
        stats.apply(HitEffect::LowerRisk { value: 1.0 }, &curves);
        assert!((stats.health() - 0.1).abs() < 1e-5);

        let change = stats.apply(HitEffect::RaiseRisk { weight: 1.0 }, &curves);
        assert!(change.died);
        assert_eq!(stats.health(), 0.0);
        // Risk stays far from its maximum
        assert!(stats.risk() < MAX_RISK);
    }

    #[derive(Debug, Clone)]
    enum Event {
        Hazard(f32),
        Pickup(f32),
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            (0.0f32..3.0).prop_map(Event::Hazard),
            (0.0f32..3.0).prop_map(Event::Pickup),
        ]
    }

    proptest! {
        #[test]
        fn test_risk_and_health_stay_clamped(
            events in prop::collection::vec(event(), 0..64),
            factor in 0.0f32..3.0,
            health_rule in any::<bool>(),
        ) {
            let rule = if health_rule {
                DeathRule::HealthDepleted
            } else {
                DeathRule::RiskMaximum
            };
            let curves = DifficultyCurves::default();
            let mut stats = PlayerStats::new(factor, rule);
            let mut deaths = 0;

            for event in events {
                let effect = match event {
                    Event::Hazard(weight) => HitEffect::RaiseRisk { weight },
                    Event::Pickup(value) => HitEffect::LowerRisk { value },
                };
                if stats.apply(effect, &curves).died {
                    deaths += 1;
                }
                prop_assert!((0.0..=MAX_RISK).contains(&stats.risk()));
                prop_assert!((0.0..=1.0).contains(&stats.health()));
            }
            prop_assert!(deaths <= 1);
        }
    }
}
