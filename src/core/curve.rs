//! Keyframe curves and exponential approach
//!
//! A curve is a sorted list of `(x, y)` breakpoints evaluated with linear
//! interpolation. Inputs outside the keyed range clamp to the first or last
//! value, so evaluation is total over all finite inputs.

use crate::core::error::{DiveError, Result};
use serde::{Deserialize, Serialize};

/// Piecewise-linear curve over sorted keyframes
///
/// Serialized as a bare list of `[x, y]` pairs; deserializing goes through
/// `Curve::new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f32, f32)>", into = "Vec<(f32, f32)>")]
pub struct Curve {
    keys: Vec<(f32, f32)>,
}

impl Curve {
    /// Build a curve, rejecting empty, unsorted or non-finite keyframes
    pub fn new(keys: Vec<(f32, f32)>) -> Result<Self> {
        if keys.is_empty() {
            return Err(DiveError::InvalidArgument("curve needs at least one keyframe".into()));
        }
        if keys.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(DiveError::InvalidArgument("curve keyframes must be finite".into()));
        }
        if keys.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(DiveError::InvalidArgument(
                "curve keyframes must be strictly increasing in x".into(),
            ));
        }
        Ok(Self { keys })
    }

    fn from_static(keys: &[(f32, f32)]) -> Self {
        debug_assert!(keys.windows(2).all(|w| w[1].0 > w[0].0));
        Self { keys: keys.to_vec() }
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    /// Evaluate the curve at `x`
    pub fn evaluate(&self, x: f32) -> f32 {
        let (first_x, first_y) = self.keys[0];
        let (last_x, last_y) = self.keys[self.keys.len() - 1];

        if x.is_nan() || x <= first_x {
            return first_y;
        }
        if x >= last_x {
            return last_y;
        }

        // First keyframe strictly right of x; x > first_x guarantees idx >= 1
        let idx = self.keys.partition_point(|(kx, _)| *kx <= x);
        let (x0, y0) = self.keys[idx - 1];
        let (x1, y1) = self.keys[idx];
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

impl TryFrom<Vec<(f32, f32)>> for Curve {
    type Error = DiveError;

    fn try_from(keys: Vec<(f32, f32)>) -> Result<Self> {
        Curve::new(keys)
    }
}

impl From<Curve> for Vec<(f32, f32)> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

/// Exponential step of `current` toward `target`
///
/// Moves by `1 - e^(-rate * dt)` of the remaining gap, so it never overshoots.
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return current;
    }
    let t = 1.0 - (-rate * dt).exp();
    current + (target - current) * t
}

/// Depth-derived multiplier for safe-depth chasing, keyed on `depth / 2000`
pub fn intensity() -> Curve {
    Curve::from_static(&[(0.0, 0.20), (1.0, 1.00)])
}

/// Saturation update rate, keyed on normalised time
pub fn nitrogen_rate() -> Curve {
    Curve::from_static(&[
        (0.0, 0.0),
        (0.095, 0.05),
        (0.1, 1.0),
        (0.2, 1.25),
        (1.2, 10.0),
    ])
}

/// Fast-ascent punishment multiplier, keyed on seconds of danger past the grace time
pub fn punish_ramp() -> Curve {
    Curve::from_static(&[(0.0, 0.5), (2.0, 1.0)])
}

/// Safe depth left after a bends damage tick, keyed on the previous safe depth
pub fn recovery() -> Curve {
    Curve::from_static(&[
        (0.0, 0.0),
        (10.0, 6.0),
        (50.0, 40.0),
        (200.0, 170.0),
        (2000.0, 1800.0),
    ])
}

/// The curve set used by one simulation
#[derive(Debug, Clone)]
pub struct DiveCurves {
    pub intensity: Curve,
    pub nitrogen_rate: Curve,
    pub punish_ramp: Curve,
    pub recovery: Curve,
}

impl Default for DiveCurves {
    fn default() -> Self {
        Self {
            intensity: intensity(),
            nitrogen_rate: nitrogen_rate(),
            punish_ramp: punish_ramp(),
            recovery: recovery(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_clamps_outside_range() {
        let curve = intensity();
        assert_eq!(curve.evaluate(-1.0), 0.20);
        assert_eq!(curve.evaluate(5.0), 1.00);
        assert_eq!(curve.evaluate(f32::NAN), 0.20);
    }

    #[test]
    fn test_curve_interpolates_linearly() {
        let curve = intensity();
        assert!((curve.evaluate(0.5) - 0.6).abs() < 1e-6);
        assert!((curve.evaluate(300.0 / 2000.0) - 0.32).abs() < 1e-6);
    }

    #[test]
    fn test_nitrogen_curve_breakpoints() {
        let curve = nitrogen_rate();
        assert!((curve.evaluate(0.1) - 1.0).abs() < 1e-6);
        assert!((curve.evaluate(0.2) - 1.25).abs() < 1e-6);
        assert!((curve.evaluate(1.2) - 10.0).abs() < 1e-6);
        assert!(curve.evaluate(0.09) < 0.1);
    }

    #[test]
    fn test_curve_hits_keyframes_exactly() {
        let curve = recovery();
        for &(x, y) in curve.keys() {
            assert_eq!(curve.evaluate(x), y);
        }
    }

    #[test]
    fn test_builtin_curves_are_monotonic() {
        for curve in [intensity(), nitrogen_rate(), punish_ramp(), recovery()] {
            let mut last = f32::MIN;
            for i in 0..=2400 {
                let v = curve.evaluate(i as f32);
                assert!(v >= last);
                last = v;
            }
        }
    }

    #[test]
    fn test_new_rejects_bad_keys() {
        assert!(Curve::new(vec![]).is_err());
        assert!(Curve::new(vec![(1.0, 0.0), (0.0, 1.0)]).is_err());
        assert!(Curve::new(vec![(0.0, f32::INFINITY)]).is_err());
        assert!(Curve::new(vec![(0.0, 0.0), (1.0, 2.0)]).is_ok());
    }

    #[test]
    fn test_deserialize_validates_keys() {
        assert!(serde_json::from_str::<Curve>("[]").is_err());
        assert!(serde_json::from_str::<Curve>(r#"{"keys":[]}"#).is_err());
        assert!(serde_json::from_str::<Curve>("[[1.0, 0.0], [0.0, 1.0]]").is_err());

        let curve: Curve = serde_json::from_str("[[0.0, 0.5], [2.0, 1.0]]").unwrap();
        assert_eq!(curve, punish_ramp());
        assert_eq!(serde_json::to_string(&curve).unwrap(), "[[0.0,0.5],[2.0,1.0]]");
    }

    #[test]
    fn test_single_key_curve_is_constant() {
        let curve = Curve::new(vec![(3.0, 7.0)]).unwrap();
        assert_eq!(curve.evaluate(-10.0), 7.0);
        assert_eq!(curve.evaluate(10.0), 7.0);
    }

    #[test]
    fn test_approach_never_overshoots() {
        let mut value = 0.0;
        for _ in 0..1000 {
            value = approach(value, 100.0, 10.0, 0.25);
            assert!(value <= 100.0);
        }
        assert!(value > 99.99);

        let down = approach(50.0, 0.0, 1.0, 0.25);
        assert!(down < 50.0 && down > 0.0);
    }

    #[test]
    fn test_approach_zero_rate_is_identity() {
        assert_eq!(approach(12.0, 40.0, 0.0, 0.25), 12.0);
        assert_eq!(approach(12.0, 40.0, 1.0, 0.0), 12.0);
    }
}
