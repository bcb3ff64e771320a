//! Score accrual

use serde::{Deserialize, Serialize};

/// Bonus for a correct quiz answer, before the divisor
pub const CORRECT_ANSWER_BONUS: f32 = 250.0;

/// Run score; never decreases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    value: f32,
    /// Distance at which the last per-unit award was paid
    last_award_distance: f32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Score as shown on screen (truncated)
    pub fn display(&self) -> String {
        format!("{}", self.value as i64)
    }

    /// Pay `rate` for every whole unit walked since the last award.
    ///
    /// Returns the number of units paid. Negative rates pay nothing.
    pub fn award_distance(&mut self, distance_walked: f32, rate: f32) -> u32 {
        let units = (distance_walked - self.last_award_distance).floor();
        if units.is_nan() || units < 1.0 {
            return 0;
        }
        self.last_award_distance += units;
        self.value += rate.max(0.0) * units;
        units as u32
    }

    /// Add `bonus / divisor` for a correct answer; non-positive divisors are ignored
    pub fn award_correct_answer(&mut self, bonus: f32, divisor: f32) -> bool {
        if divisor <= 0.0 || !divisor.is_finite() {
            return false;
        }
        self.value += (bonus / divisor).max(0.0);
        true
    }
}
