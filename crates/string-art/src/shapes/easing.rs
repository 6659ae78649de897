//! Easing functions for non-uniform nail spacing.
//!
//! An easing maps the normalized position `t` in `[0, 1]` to a normalized
//! angle, also in `[0, 1]`. Every variant keeps `f(0) = 0`, `f(1) = 1` and is
//! monotonic for its valid parameter range, so nails never swap order.

use serde::{Deserialize, Serialize};

use crate::geometry::PI2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Easing {
    #[default]
    Linear,
    /// `t^p`: sparse at the start, dense at the end.
    EaseIn(f64),
    /// Mirror of `EaseIn`.
    EaseOut(f64),
    /// `EaseIn` on the first half, `EaseOut` on the second.
    EaseInOut(f64),
    /// Nails spread at both ends, bunched in the middle. Magnitude in `[0, 1]`.
    FastSlowFast(f64),
    /// Nails bunched at both ends, spread in the middle. Magnitude in `[0, 1]`.
    SlowFastSlow(f64),
}

impl Easing {
    /// Parse an easing from its name and parameter, as used by select controls.
    pub fn from_name(name: &str, value: f64) -> Option<Easing> {
        match name {
            "linear" => Some(Easing::Linear),
            "easeIn" => Some(Easing::EaseIn(value)),
            "easeOut" => Some(Easing::EaseOut(value)),
            "easeInOut" => Some(Easing::EaseInOut(value)),
            "fastSlowFast" => Some(Easing::FastSlowFast(value)),
            "slowFastSlow" => Some(Easing::SlowFastSlow(value)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn(_) => "easeIn",
            Easing::EaseOut(_) => "easeOut",
            Easing::EaseInOut(_) => "easeInOut",
            Easing::FastSlowFast(_) => "fastSlowFast",
            Easing::SlowFastSlow(_) => "slowFastSlow",
        }
    }

    pub fn apply(&self, t: f64) -> f64 {
        match *self {
            Easing::Linear => t,
            Easing::EaseIn(p) => t.powf(p.max(f64::EPSILON)),
            Easing::EaseOut(p) => 1.0 - (1.0 - t).powf(p.max(f64::EPSILON)),
            Easing::EaseInOut(p) => {
                let p = p.max(f64::EPSILON);
                if t < 0.5 {
                    0.5 * (2.0 * t).powf(p)
                } else {
                    1.0 - 0.5 * (2.0 - 2.0 * t).powf(p)
                }
            }
            Easing::FastSlowFast(m) => t + m.clamp(0.0, 1.0) * (PI2 * t).sin() / PI2,
            Easing::SlowFastSlow(m) => t - m.clamp(0.0, 1.0) * (PI2 * t).sin() / PI2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_monotonic(easing: Easing) -> bool {
        let samples: Vec<f64> = (0..=1000).map(|i| easing.apply(i as f64 / 1000.0)).collect();
        samples.windows(2).all(|w| w[1] >= w[0] - 1e-12)
    }

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn(2.0),
        Easing::EaseOut(3.0),
        Easing::EaseInOut(2.5),
        Easing::FastSlowFast(1.0),
        Easing::SlowFastSlow(0.6),
    ];

    #[test]
    fn endpoints_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-12, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{:?} at 1", easing);
        }
    }

    #[test]
    fn all_monotonic() {
        for easing in ALL {
            assert!(is_monotonic(easing), "{:?} is not monotonic", easing);
        }
    }

    #[test]
    fn fast_slow_fast_is_dense_in_middle() {
        let easing = Easing::FastSlowFast(0.8);
        let edge_gap = easing.apply(0.01) - easing.apply(0.0);
        let middle_gap = easing.apply(0.51) - easing.apply(0.5);
        assert!(edge_gap > middle_gap);
        assert!((easing.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn names_round_trip() {
        for easing in ALL {
            let value = match easing {
                Easing::Linear => 0.0,
                Easing::EaseIn(v)
                | Easing::EaseOut(v)
                | Easing::EaseInOut(v)
                | Easing::FastSlowFast(v)
                | Easing::SlowFastSlow(v) => v,
            };
            assert_eq!(Easing::from_name(easing.name(), value), Some(easing));
        }
        assert_eq!(Easing::from_name("bounce", 1.0), None);
    }
}
