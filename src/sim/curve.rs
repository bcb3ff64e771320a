//! Sampled 1-D curves
//!
//! Balance curves are authored data: a sorted list of keyframes evaluated with
//! linear interpolation and clamped at both ends.

use serde::{Deserialize, Serialize};

/// A single curve key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub t: f32,
    pub value: f32,
}

impl Keyframe {
    pub const fn new(t: f32, value: f32) -> Self {
        Self { t, value }
    }
}

/// Piecewise-linear curve over sorted keyframes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    /// Build a curve, sorting keys by `t`
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { keys }
    }

    /// Curve that returns `value` everywhere
    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::new(0.0, value)])
    }

    /// Straight line from (t0, v0) to (t1, v1), flat outside
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        Self::new(vec![Keyframe::new(t0, v0), Keyframe::new(t1, v1)])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Sample the curve at `t`
    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if t.is_nan() || t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }

        // first.t < t < last.t, so 1 <= i < len
        let i = self.keys.partition_point(|k| k.t <= t);
        let a = self.keys[i - 1];
        let b = self.keys[i];
        let span = b.t - a.t;
        if span <= f32::EPSILON {
            return b.value;
        }
        a.value + (b.value - a.value) * ((t - a.t) / span)
    }
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve_is_zero() {
        assert_eq!(Curve::default().evaluate(1.0), 0.0);
    }

    #[test]
    fn test_clamps_outside_keys() {
        let curve = Curve::linear(0.0, 10.0, 4.0, 6.0);
        assert_eq!(curve.evaluate(-1.0), 10.0);
        assert_eq!(curve.evaluate(5.0), 6.0);
        assert_eq!(curve.evaluate(f32::NAN), 10.0);
    }

    #[test]
    fn test_interpolates_between_keys() {
        let curve = Curve::new(vec![
            Keyframe::new(2.0, 1.0),
            Keyframe::new(0.0, 0.0),
            Keyframe::new(4.0, 0.0),
        ]);
        assert!((curve.evaluate(1.0) - 0.5).abs() < 1e-6);
        assert!((curve.evaluate(2.0) - 1.0).abs() < 1e-6);
        assert!((curve.evaluate(3.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_deserializes_unsorted_keys() {
        let curve: Curve =
            serde_json::from_str(r#"[{"t": 1.0, "value": 2.0}, {"t": 0.0, "value": 0.0}]"#)
                .unwrap();
        assert_eq!(curve.keys()[0].t, 0.0);
        assert!((curve.evaluate(0.5) - 1.0).abs() < 1e-6);
    }
}
